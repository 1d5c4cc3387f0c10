//! Core types for DID:WEB resolution.
//!
//! This module provides the resolution options, the DNS-over-HTTPS provider
//! enumeration and the opaque DID Document returned by a successful resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ResolutionError;

/// Cloudflare's JSON DNS-over-HTTPS endpoint
pub const CLOUDFLARE_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// A DID Document.
///
/// The document is kept as an arbitrary JSON object. Only the `id` field is
/// contractually required; everything else is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DidDocument(Map<String, Value>);

impl DidDocument {
    /// Wraps a decoded JSON object
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The declared identifier, if present and a string
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Looks up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for DidDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// DNS-over-HTTPS provider used to look up the DID host before fetching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DohProvider {
    /// Use the system resolver
    #[default]
    None,
    /// Resolve through Cloudflare's DoH endpoint
    Cloudflare,
}

impl DohProvider {
    /// The DoH JSON endpoint for this provider, if any
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            DohProvider::None => None,
            DohProvider::Cloudflare => Some(CLOUDFLARE_DOH_ENDPOINT),
        }
    }
}

impl fmt::Display for DohProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DohProvider::None => f.write_str("none"),
            DohProvider::Cloudflare => f.write_str("cloudflare"),
        }
    }
}

impl FromStr for DohProvider {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(DohProvider::None),
            "cloudflare" => Ok(DohProvider::Cloudflare),
            other => Err(ResolutionError::InvalidOptions(format!(
                "unknown doh provider '{other}', expected one of: none, cloudflare"
            ))),
        }
    }
}

/// Options for DID resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionOptions {
    /// Resolve the DID host through DNS-over-HTTPS first
    pub doh: DohProvider,
}

impl ResolutionOptions {
    /// Validates untyped options.
    ///
    /// `null` yields the defaults. Unknown keys, unknown `doh` values and
    /// anything that is not an object are rejected.
    pub fn from_json(value: &Value) -> Result<Self, ResolutionError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_object() {
            return Err(ResolutionError::InvalidOptions(format!(
                "expected an object, found {value}"
            )));
        }
        Self::deserialize(value).map_err(|e| ResolutionError::InvalidOptions(e.to_string()))
    }
}
