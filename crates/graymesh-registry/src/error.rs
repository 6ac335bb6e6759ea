use thiserror::Error;

/// Typed failures raised by a [`crate::RegistryBackend`].
///
/// Every variant is swallowed at the [`crate::RegistryClient`] boundary
/// and converted into a cache or default result; a transient registry
/// outage must never crash or block a caller.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unreachable: {0}")]
    RemoteUnavailable(String),

    #[error("registry rejected the request: {0}")]
    Rejected(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
