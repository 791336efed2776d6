//! Error type returned by counter lookups.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, CountError>;

/// Failure of a count lookup.
///
/// Absence is an expected condition ("no observations yet"), distinct
/// from an identifier that was registered once and therefore counts 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountError {
    #[error("identifier not found: {identifier}")]
    NotFound { identifier: String },
}

impl CountError {
    pub(crate) fn not_found(identifier: &str) -> Self {
        CountError::NotFound {
            identifier: identifier.to_owned(),
        }
    }

    /// The identifier the failed lookup was made for.
    pub fn identifier(&self) -> &str {
        match self {
            CountError::NotFound { identifier } => identifier,
        }
    }
}
