//! The low-level "send one echo request, await the reply" primitive.
//!
//! The engine never builds packets itself. It talks to an [`EchoPrimitive`],
//! which the default [`icmp::IcmpEcho`] implements on top of the operating
//! system's ICMP sockets, and which tests replace with scripted fakes.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod icmp;

pub use icmp::IcmpEcho;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EchoError {
    #[error("no reply within the timeout")]
    Timeout,
    #[error("failed to resolve {0}")]
    Resolution(String),
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait EchoPrimitive: Send + Sync {
    /// Sends one echo request to `host` and returns the measured round trip.
    async fn echo(&self, host: &str, timeout: Duration) -> Result<Duration, EchoError>;
}
