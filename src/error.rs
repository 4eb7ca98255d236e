//! Error types for the PowCollective API

use thiserror::Error;

/// Errors surfaced by the conditions service
///
/// Upstream forecast failures are deliberately absent here: they are absorbed
/// at the client/cache boundary and degrade to the stub snapshot instead of
/// failing the request.
#[derive(Error, Debug)]
pub enum ConditionsError {
    /// The requested slug does not resolve in the resort directory
    #[error("Resort not found: {slug}")]
    ResortNotFound { slug: String },
}

impl ConditionsError {
    /// Create a new resort-not-found error
    pub fn resort_not_found<S: Into<String>>(slug: S) -> Self {
        Self::ResortNotFound { slug: slug.into() }
    }
}
