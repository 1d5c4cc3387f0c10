//! HTTP transport used by the DoH lookup and the document fetch.
//!
//! [`HttpClient`] is the seam between the resolution pipeline and the network.
//! [`ReqwestClient`] is the production implementation; tests substitute an
//! in-memory client.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::ResolutionError;

/// A single outbound GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
    /// Value of the `Accept` header, if any
    pub accept: Option<&'static str>,
    /// Connect to this address instead of resolving the URL host.
    /// The URL host is still used for SNI and the `Host` header.
    pub pinned_ip: Option<IpAddr>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self { url, accept: None, pinned_ip: None }
    }

    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    pub fn pinned_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.pinned_ip = ip;
        self
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs GET requests for the resolver.
///
/// Implementations follow redirects and report connection failures as
/// [`ResolutionError::Http`]. Status codes are returned as-is; interpreting
/// them is up to the caller.
pub trait HttpClient {
    fn get(
        &self, request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ResolutionError>> + Send;
}

/// Settings for the reqwest transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Total time allowed for a request, unlimited when `None`
    pub timeout: Option<Duration>,
    /// Time allowed to establish the connection, unlimited when `None`
    pub connect_timeout: Option<Duration>,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            max_redirects: 10,
            user_agent: concat!("didweb-resolver/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`HttpClient`] backed by reqwest.
///
/// A fresh `reqwest::Client` is built for every request so that a pinned
/// address never leaks into another lookup and the connection is closed
/// when the call returns, on success or failure.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    config: ClientConfig,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_client(&self, request: &HttpRequest) -> Result<Client, ResolutionError> {
        let mut builder = Client::builder().redirect(Policy::limited(self.config.max_redirects));

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        if let Some(ip) = request.pinned_ip {
            let host = request.url.host_str().ok_or_else(|| {
                ResolutionError::Http(format!("cannot pin {ip}: {} has no host", request.url))
            })?;
            // reqwest ignores the port here and uses the one from the URL
            builder = builder.resolve(host, SocketAddr::new(ip, 0));
        }

        builder.build().map_err(ResolutionError::from)
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, ResolutionError> {
        let client = self.build_client(&request)?;

        let mut req = client.get(request.url.clone()).header(USER_AGENT, &self.config.user_agent);
        if let Some(accept) = request.accept {
            req = req.header(ACCEPT, accept);
        }

        let response = req.send().await.map_err(|e| {
            ResolutionError::Http(format!("request to {} failed: {e}", request.url))
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            ResolutionError::Http(format!("reading response from {} failed: {e}", request.url))
        })?;

        debug!(url = %request.url, status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, body: body.to_vec() })
    }
}
