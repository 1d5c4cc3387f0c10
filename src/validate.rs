//! Identity check of a fetched DID Document.

use crate::error::ResolutionError;
use crate::types::DidDocument;

/// Accepts the document only if its `id` is exactly the requested DID.
///
/// No normalization is applied; a document served for another DID, or one
/// without a string `id`, is rejected.
pub fn validate(did: &str, document: DidDocument) -> Result<DidDocument, ResolutionError> {
    match document.id() {
        Some(id) if id == did => Ok(document),
        Some(id) => Err(ResolutionError::Validation(format!(
            "DID document id '{id}' does not match expected '{did}'"
        ))),
        None => Err(ResolutionError::Validation(format!(
            "DID document has no string 'id' field, expected '{did}'"
        ))),
    }
}
