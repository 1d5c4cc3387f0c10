//! Core DID resolution functionality.
//!
//! This module sequences the resolution pipeline for DID:WEB identifiers:
//! options validation, URL mapping, the optional DoH lookup, the document fetch,
//! decoding and the identity check. The first stage to fail ends the call and
//! its error is returned unchanged.

use std::net::IpAddr;

use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::decode::decode;
use crate::did::WebDid;
use crate::doh::DohResolver;
use crate::error::ResolutionError;
use crate::fetch::fetch;
use crate::http::{ClientConfig, HttpClient, ReqwestClient};
use crate::types::{DidDocument, ResolutionOptions};
use crate::validate::validate;

/// Core resolver for DID:WEB resolution.
///
/// Holds no state between calls, so one instance can serve concurrent
/// resolutions.
#[derive(Debug, Clone)]
pub struct Resolver<C = ReqwestClient> {
    /// HTTP client for the DoH query and the document fetch
    client: C,
}

impl Resolver<ReqwestClient> {
    /// Creates a new Resolver using reqwest with default settings
    pub fn new() -> Self {
        Self::with_client(ReqwestClient::new())
    }

    /// Creates a new Resolver using reqwest with the given settings
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_client(ReqwestClient::with_config(config))
    }
}

impl Default for Resolver<ReqwestClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> Resolver<C> {
    /// Creates a new Resolver on top of a custom transport
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves a DID:WEB identifier
    ///
    /// # Arguments
    /// * `did` - The DID to resolve
    /// * `options` - Optional resolution parameters, defaults to no DoH
    ///
    /// # Example
    /// ```no_run
    /// use didweb_resolver::{DohProvider, Resolver, ResolutionOptions};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let resolver = Resolver::new();
    ///     let options = ResolutionOptions { doh: DohProvider::Cloudflare };
    ///     let document = resolver.resolve("did:web:example.com", Some(options)).await?;
    ///     println!("Resolved DID Document: {:?}", document);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(level = "debug", skip(self, options), fields(doh = %options.unwrap_or_default().doh))]
    pub async fn resolve(
        &self, did: &str, options: Option<ResolutionOptions>,
    ) -> Result<DidDocument, ResolutionError> {
        let options = options.unwrap_or_default();

        let result = self.run(did, options).await;
        if let Err(err) = &result {
            warn!(kind = %err.kind(), error = %err.message(), "DID resolution failed");
        }
        result
    }

    /// Resolves a DID:WEB identifier with untyped options.
    ///
    /// The options are validated before anything else, so malformed options
    /// fail with [`ResolutionError::InvalidOptions`] whatever the DID.
    pub async fn resolve_with_raw_options(
        &self, did: &str, options: &Value,
    ) -> Result<DidDocument, ResolutionError> {
        let options = ResolutionOptions::from_json(options).inspect_err(|err| {
            warn!(kind = %err.kind(), error = %err.message(), "rejected resolution options");
        })?;
        self.resolve(did, Some(options)).await
    }

    async fn run(&self, did: &str, options: ResolutionOptions) -> Result<DidDocument, ResolutionError> {
        let url = WebDid::parse(did)?.to_url()?;
        debug!(%url, "mapped DID to URL");

        let pinned_ip = self.lookup(&options, &url).await?;

        let body = fetch(&self.client, &url, pinned_ip).await?;
        let document = DidDocument::new(decode(&body)?);

        validate(did, document)
    }

    async fn lookup(
        &self, options: &ResolutionOptions, url: &Url,
    ) -> Result<Option<IpAddr>, ResolutionError> {
        let Some(doh) = DohResolver::for_provider(options.doh) else {
            return Ok(None);
        };
        let Some(host) = url.host_str() else {
            return Ok(None);
        };
        debug!(host, endpoint = doh.endpoint(), "resolving host via DoH");

        doh.resolve_ip(&self.client, host).await.map(Some)
    }
}

/// Convenience function for resolving a DID without creating a Resolver instance
pub async fn resolve_did(
    did: &str, options: Option<ResolutionOptions>,
) -> Result<DidDocument, ResolutionError> {
    Resolver::new().resolve(did, options).await
}
