//! DNS-over-HTTPS lookup of the DID host.
//!
//! Resolving the host through a DoH provider keeps the hostname away from the
//! ambient DNS resolver. The resulting address is then pinned for the document
//! fetch, see [`HttpRequest`](crate::HttpRequest).
//!
//! Only the JSON flavour of DoH (`application/dns-json`) is supported.

use std::net::{IpAddr, Ipv4Addr};

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::decode::decode;
use crate::error::ResolutionError;
use crate::http::{HttpClient, HttpRequest};
use crate::types::{DohProvider, CLOUDFLARE_DOH_ENDPOINT};

/// `Accept` header required by JSON DoH endpoints
pub const DNS_JSON_ACCEPT: &str = "application/dns-json";

/// DNS record type of an IPv4 address record
const RECORD_TYPE_A: u64 = 1;

/// Resolves hostnames to IPv4 addresses through a JSON DoH endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DohResolver {
    endpoint: String,
}

impl Default for DohResolver {
    fn default() -> Self {
        Self::cloudflare()
    }
}

impl DohResolver {
    /// Resolver using Cloudflare's public endpoint
    pub fn cloudflare() -> Self {
        Self { endpoint: CLOUDFLARE_DOH_ENDPOINT.to_string() }
    }

    /// Resolver for a configured provider, `None` when DoH is disabled
    pub fn for_provider(provider: DohProvider) -> Option<Self> {
        provider.endpoint().map(|endpoint| Self { endpoint: endpoint.to_string() })
    }

    /// Resolver using a custom JSON DoH endpoint, e.g. `https://dns.google/resolve`
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self { endpoint: endpoint.to_string() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The query URL for `host`
    pub fn query_url(&self, host: &str) -> Result<Url, ResolutionError> {
        Url::parse_with_params(&self.endpoint, &[("name", host)]).map_err(|e| {
            ResolutionError::Dns(format!("invalid DoH endpoint {}: {e}", self.endpoint))
        })
    }

    /// Looks up the first A record for `host`
    pub async fn resolve_ip<C: HttpClient>(
        &self, client: &C, host: &str,
    ) -> Result<IpAddr, ResolutionError> {
        let url = self.query_url(host)?;
        let request = HttpRequest::get(url.clone()).accept(DNS_JSON_ACCEPT);

        let response = client.get(request).await.map_err(|e| match e {
            ResolutionError::Http(msg) => ResolutionError::Http(format!("DoH query failed: {msg}")),
            other => other,
        })?;

        if response.status != 200 {
            return Err(ResolutionError::Dns(format!(
                "DoH query {url} returned HTTP {}",
                response.status
            )));
        }

        let body = decode(&response.body)?;
        let ip = first_a_record(host, body.get("Answer"))?;

        debug!(host, %ip, "resolved host via DoH");
        Ok(ip)
    }
}

fn first_a_record(host: &str, answer: Option<&Value>) -> Result<IpAddr, ResolutionError> {
    let Some(records) = answer.and_then(Value::as_array) else {
        return Err(ResolutionError::Dns(format!("no Answer field in DoH response for {host}")));
    };

    let data = records
        .iter()
        .find(|record| record.get("type").and_then(Value::as_u64) == Some(RECORD_TYPE_A))
        .and_then(|record| record.get("data"))
        .ok_or_else(|| ResolutionError::Dns(format!("no A record found for {host}")))?;

    data.as_str()
        .and_then(|s| s.parse::<Ipv4Addr>().ok())
        .map(IpAddr::V4)
        .ok_or_else(|| ResolutionError::Dns(format!("A record for {host} is not an IPv4 address: {data}")))
}
