//! DID Document retrieval.

use std::net::IpAddr;

use tracing::debug;
use url::Url;

use crate::error::ResolutionError;
use crate::http::{HttpClient, HttpRequest};

/// `Accept` header sent with document requests
pub const DID_JSON_ACCEPT: &str = "application/did+json, application/json";

/// Issues one GET for `url` and returns the body of a 200 response.
///
/// When `pinned_ip` is set the connection goes to that address while the URL
/// host is kept for TLS and the `Host` header.
pub async fn fetch<C: HttpClient>(
    client: &C, url: &Url, pinned_ip: Option<IpAddr>,
) -> Result<Vec<u8>, ResolutionError> {
    debug!(%url, ?pinned_ip, "fetching DID document");

    let request = HttpRequest::get(url.clone()).accept(DID_JSON_ACCEPT).pinned_ip(pinned_ip);
    let response = client.get(request).await?;

    if response.status != 200 {
        return Err(ResolutionError::Http(format!(
            "HTTP {} when fetching DID document from {url}",
            response.status
        )));
    }

    Ok(response.body)
}
