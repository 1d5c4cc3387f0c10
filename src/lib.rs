//! A resolver implementation for the DID:WEB method.
//!
//! A `did:web` identifier is mapped to an HTTPS URL, the DID Document is fetched
//! from it and accepted only when its `id` equals the requested DID. The host can
//! optionally be looked up through DNS-over-HTTPS so the plaintext hostname never
//! reaches the system resolver.
//!
//! Resolution holds no state between calls and never caches documents.

mod decode;
mod did;
mod doh;
mod error;
mod fetch;
mod http;
mod resolver;
mod types;
mod validate;

pub use did::{resolve_url, WebDid, DID_WEB_PREFIX};
pub use doh::{DohResolver, DNS_JSON_ACCEPT};
pub use error::{ErrorKind, ResolutionError};
pub use fetch::DID_JSON_ACCEPT;
pub use http::{ClientConfig, HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use resolver::{resolve_did, Resolver};
pub use types::{DidDocument, DohProvider, ResolutionOptions, CLOUDFLARE_DOH_ENDPOINT};

/// Resolves a DID:WEB identifier with optional resolution parameters
///
/// # Arguments
/// * `did` - The DID:WEB identifier to resolve
/// * `options` - Optional resolution parameters
///
/// # Example
/// ```no_run
/// use didweb_resolver::resolve;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let document = resolve("did:web:example.com", None).await?;
///
///     println!("Resolved DID Document: {:?}", document);
///     Ok(())
/// }
/// ```
pub async fn resolve(
    did: &str,
    options: Option<ResolutionOptions>,
) -> Result<DidDocument, ResolutionError> {
    resolve_did(did, options).await
}

/// Resolves a DID:WEB identifier with options given as JSON, e.g.
/// `{"doh": "cloudflare"}`. Invalid options are rejected before the DID is
/// looked at.
pub async fn resolve_raw(
    did: &str,
    options: &serde_json::Value,
) -> Result<DidDocument, ResolutionError> {
    Resolver::new().resolve_with_raw_options(did, options).await
}
