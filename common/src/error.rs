use thiserror::Error;

/// Errors returned synchronously by host membership operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{0}: invalid host format")]
    InvalidFormat(String),
    #[error("{0} is already in the list")]
    DuplicateHost(String),
    #[error("{0} is not in the list")]
    NotFound(String),
}

/// Why a single probe failed.
///
/// Local to one probe cycle: recorded as a failed delivery and reported to the
/// sink, never fatal to the monitoring loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeErrorKind {
    #[error("reply timed out")]
    Timeout,
    #[error("could not resolve host name")]
    ResolutionFailed,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("metrics window must hold at least one probe")]
    EmptyWindow,
}
