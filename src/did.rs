//! DID parsing and URL transformation functionality.
//!
//! This module handles the validation of DID:WEB identifiers and their
//! transformation into the HTTPS URL of the DID Document.
//!
//! Unencoded colons separate path segments. A percent-encoded colon (`%3A`)
//! survives the segment split and decodes into the port separator, so
//! `did:web:example.com%3A3000:user` maps to `https://example.com:3000/user/did.json`.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::ResolutionError;

/// The prefix every DID:WEB identifier starts with
pub const DID_WEB_PREFIX: &str = "did:web:";

const WELL_KNOWN_PATH: &str = "/.well-known/did.json";
const DOCUMENT_FILE: &str = "did.json";

/// Represents a DID:WEB identifier that has passed the prefix check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDid<'a> {
    did: &'a str,
    /// Everything after `did:web:`
    domain_path: &'a str,
}

impl<'a> WebDid<'a> {
    /// Checks the `did:web:` prefix and splits off the domain-path
    pub fn parse(did: &'a str) -> Result<Self, ResolutionError> {
        let domain_path = did.strip_prefix(DID_WEB_PREFIX).ok_or_else(|| {
            ResolutionError::InvalidInput("DID does not start with 'did:web:'".to_string())
        })?;

        Ok(Self { did, domain_path })
    }

    pub fn as_str(&self) -> &'a str {
        self.did
    }

    /// The method-specific part, still percent-encoded
    pub fn domain_path(&self) -> &'a str {
        self.domain_path
    }

    /// Converts the DID to the HTTPS URL of its DID Document
    pub fn to_url(&self) -> Result<Url, ResolutionError> {
        let slashed = self.domain_path.replace(':', "/");
        let decoded = percent_decode_str(&slashed).decode_utf8().map_err(|e| {
            ResolutionError::InvalidInput(format!("DID is not valid percent-encoded UTF-8: {e}"))
        })?;

        let attempted = format!("https://{decoded}");
        let mut url = Url::parse(&attempted)
            .map_err(|_| ResolutionError::InvalidInput(format!("Not a valid URL: {attempted}")))?;

        if url.fragment().is_some() {
            return Err(ResolutionError::InvalidInput("URL contains a fragment".to_string()));
        }

        // Deliberately loose: rejects bare hostnames, not full hostname grammar.
        match url.host_str() {
            Some(host) if host.contains('.') => {}
            _ => return Err(ResolutionError::InvalidInput(format!("Not a valid URL: {attempted}"))),
        }

        let path = url.path().trim_end_matches('/').to_string();
        if path.is_empty() {
            url.set_path(WELL_KNOWN_PATH);
        } else {
            url.set_path(&format!("{path}/{DOCUMENT_FILE}"));
        }

        Ok(url)
    }
}

/// Maps a DID:WEB identifier to the HTTPS URL of its DID Document.
///
/// Pure function, no I/O. Exposed so callers with their own transport can
/// perform the fetch themselves.
///
/// # Example
/// ```
/// use didweb_resolver::resolve_url;
///
/// let url = resolve_url("did:web:example.com%3A3000:some:path").unwrap();
/// assert_eq!(url.as_str(), "https://example.com:3000/some/path/did.json");
/// ```
pub fn resolve_url(did: &str) -> Result<Url, ResolutionError> {
    WebDid::parse(did)?.to_url()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_transformation() {
        let test_cases = vec![
            ("did:web:example.com", "https://example.com/.well-known/did.json"),
            ("did:web:example.com%3A3000", "https://example.com:3000/.well-known/did.json"),
            ("did:web:example.com:some:path", "https://example.com/some/path/did.json"),
            (
                "did:web:example.com%3A3000:some:path",
                "https://example.com:3000/some/path/did.json",
            ),
            ("did:web:w3c-ccg.github.io:user:alice", "https://w3c-ccg.github.io/user/alice/did.json"),
            ("did:web:example.com%2Fsome%2Fpath", "https://example.com/some/path/did.json"),
            ("did:web:example.com:some:", "https://example.com/some/did.json"),
        ];

        for (did, expected_url) in test_cases {
            assert_eq!(resolve_url(did).unwrap().as_str(), expected_url, "did: {did}");
        }
    }

    #[test]
    fn test_bare_hostnames_map_to_well_known() {
        let hosts = ["example.com", "sub.example.org", "a.b.c.d.io", "127.0.0.1", "xn--bcher-kva.example"];

        for host in hosts {
            let url = resolve_url(&format!("did:web:{host}")).unwrap();
            assert_eq!(url.as_str(), format!("https://{host}/.well-known/did.json"));
        }
    }

    #[test]
    fn test_invalid_did_format() {
        let invalid_dids = vec![
            ("did:key:abc", "DID does not start with 'did:web:'"),
            ("did:tdw:abc123:example.com", "DID does not start with 'did:web:'"),
            ("web:example.com", "DID does not start with 'did:web:'"),
            ("did:web:notaurl", "Not a valid URL: https://notaurl"),
            ("did:web:", "Not a valid URL: https://"),
            ("did:web:localhost%3A3000", "Not a valid URL: https://localhost:3000"),
        ];

        for (did, message) in invalid_dids {
            assert_eq!(
                resolve_url(did),
                Err(ResolutionError::InvalidInput(message.to_string())),
                "did: {did}"
            );
        }
    }

    #[test]
    fn test_fragment_rejected() {
        for did in ["did:web:example.com/some/path#fragment", "did:web:example.com#key-1"] {
            assert_eq!(
                resolve_url(did),
                Err(ResolutionError::InvalidInput("URL contains a fragment".to_string()))
            );
        }
    }

    #[test]
    fn test_unencoded_colon_is_never_a_port() {
        let url = resolve_url("did:web:example.com:3000").unwrap();
        assert_eq!(url.port(), None);
        assert_eq!(url.as_str(), "https://example.com/3000/did.json");
    }

    #[test]
    fn test_resolve_url_is_idempotent() {
        let did = "did:web:example.com%3A8443:users:alice";
        let first = resolve_url(did).unwrap();
        for _ in 0..3 {
            assert_eq!(resolve_url(did).unwrap(), first);
        }
    }

    #[test]
    fn test_web_did_parts() {
        let did = WebDid::parse("did:web:example.com:user").unwrap();
        assert_eq!(did.as_str(), "did:web:example.com:user");
        assert_eq!(did.domain_path(), "example.com:user");
    }
}
