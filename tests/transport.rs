use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use didweb_resolver::{
    ClientConfig, DohResolver, ErrorKind, HttpClient, HttpRequest, ReqwestClient, DID_JSON_ACCEPT,
    DNS_JSON_ACCEPT,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use url::Url;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

async fn did_document() -> Json<Value> {
    Json(json!({
        "@context": "https://www.w3.org/ns/did/v1",
        "id": "did:web:did.test",
    }))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let get = |name: header::HeaderName| {
        headers.get(name).and_then(|v| v.to_str().ok()).map(String::from)
    };
    Json(json!({
        "host": get(header::HOST),
        "accept": get(header::ACCEPT),
        "user_agent": get(header::USER_AGENT),
    }))
}

async fn dns_query(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) != Some(DNS_JSON_ACCEPT) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unsupported accept" })));
    }

    let answer = match params.get("name").map(String::as_str) {
        Some("did.test") => json!({
            "Status": 0,
            "Answer": [
                { "name": "did.test", "type": 5, "TTL": 60, "data": "cdn.did.test." },
                { "name": "cdn.did.test", "type": 1, "TTL": 60, "data": "127.0.0.1" }
            ]
        }),
        Some("v6only.test") => json!({
            "Status": 0,
            "Answer": [{ "name": "v6only.test", "type": 28, "TTL": 60, "data": "::1" }]
        }),
        _ => json!({ "Status": 3 }),
    };
    (StatusCode::OK, Json(answer))
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/.well-known/did.json", get(did_document))
        .route("/moved/did.json", get(|| async { Redirect::permanent("/.well-known/did.json") }))
        .route("/headers", get(echo_headers))
        .route("/dns-query", get(dns_query))
        .route("/broken", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable") }));

    let listener = TcpListener::bind(SocketAddr::new(LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{addr}{path}")).unwrap()
}

#[tokio::test]
async fn fetches_body_and_status() {
    let addr = spawn_server().await;
    let client = ReqwestClient::new();

    let response = client.get(HttpRequest::get(url(addr, "/.well-known/did.json"))).await.unwrap();
    assert_eq!(response.status, 200);
    let body: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["id"], "did:web:did.test");

    let response = client.get(HttpRequest::get(url(addr, "/missing"))).await.unwrap();
    assert_eq!(response.status, 404);

    let response = client.get(HttpRequest::get(url(addr, "/broken"))).await.unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body, b"Service Unavailable");
}

#[tokio::test]
async fn follows_redirects() {
    let addr = spawn_server().await;
    let client = ReqwestClient::new();

    let response = client.get(HttpRequest::get(url(addr, "/moved/did.json"))).await.unwrap();
    assert_eq!(response.status, 200);
    let body: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["id"], "did:web:did.test");
}

#[tokio::test]
async fn redirects_not_followed_past_limit() {
    let addr = spawn_server().await;
    let client = ReqwestClient::with_config(ClientConfig { max_redirects: 0, ..ClientConfig::default() });

    let err = client.get(HttpRequest::get(url(addr, "/moved/did.json"))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
}

#[tokio::test]
async fn sends_accept_and_user_agent() {
    let addr = spawn_server().await;
    let client = ReqwestClient::new();

    let request = HttpRequest::get(url(addr, "/headers")).accept(DID_JSON_ACCEPT);
    let response = client.get(request).await.unwrap();
    let body: Value = serde_json::from_slice(&response.body).unwrap();

    assert_eq!(body["accept"], DID_JSON_ACCEPT);
    assert!(body["user_agent"].as_str().unwrap().starts_with("didweb-resolver/"));
}

#[tokio::test]
async fn pinned_ip_keeps_hostname() {
    let addr = spawn_server().await;
    let client = ReqwestClient::new();

    // did.test does not resolve; the pin is the only way to reach the server
    let target = Url::parse(&format!("http://did.test:{}/headers", addr.port())).unwrap();
    let request = HttpRequest::get(target).pinned_ip(Some(LOCALHOST));

    let response = client.get(request).await.unwrap();
    assert_eq!(response.status, 200);
    let body: Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["host"], format!("did.test:{}", addr.port()));
}

#[tokio::test]
async fn connection_failure_is_http_error() {
    let listener = TcpListener::bind(SocketAddr::new(LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = ReqwestClient::new().get(HttpRequest::get(url(addr, "/"))).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert!(err.message().contains(&addr.to_string()));
}

#[tokio::test]
async fn doh_lookup_over_http() {
    let addr = spawn_server().await;
    let client = ReqwestClient::new();
    let doh = DohResolver::with_endpoint(url(addr, "/dns-query"));

    let ip = doh.resolve_ip(&client, "did.test").await.unwrap();
    assert_eq!(ip, LOCALHOST);

    let err = doh.resolve_ip(&client, "nxdomain.test").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dns);
    assert!(err.message().contains("no Answer field"));

    let err = doh.resolve_ip(&client, "v6only.test").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dns);
    assert!(err.message().contains("no A record found"));
}

#[tokio::test]
async fn doh_non_200_is_dns_error() {
    let addr = spawn_server().await;
    let doh = DohResolver::with_endpoint(url(addr, "/broken"));

    let err = doh.resolve_ip(&ReqwestClient::new(), "did.test").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dns);
    assert!(err.message().contains("503"));
}
