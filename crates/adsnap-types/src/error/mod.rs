//! Typed error definitions for AdSnap.
//!
//! All errors are serializable (API responses), displayable (logging) and
//! matchable (status mapping at the HTTP boundary).

mod provider;

pub use provider::ProviderError;

/// Standard Result type using ProviderError.
pub type Result<T> = std::result::Result<T, ProviderError>;
