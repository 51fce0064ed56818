//! A single probe against a single host.
//!
//! The prober owns no state besides its echo primitive. It issues exactly one
//! echo request per call and classifies whatever comes back; repetition is
//! the monitor's job.

use std::sync::Arc;
use std::time::Duration;

use hostwatch_common::error::ProbeErrorKind;
use hostwatch_common::metrics::ProbeResult;

use crate::network::{EchoError, EchoPrimitive, IcmpEcho};

#[derive(Clone)]
pub struct Prober {
    echo: Arc<dyn EchoPrimitive>,
}

impl Prober {
    pub fn new(echo: impl EchoPrimitive + 'static) -> Self {
        Self { echo: Arc::new(echo) }
    }

    /// A prober backed by real ICMP echo requests.
    pub fn icmp() -> Self {
        Self::new(IcmpEcho::new())
    }

    /// Probes `host` once.
    ///
    /// The timeout is enforced here as well, so a primitive that ignores it
    /// still cannot hold a monitor longer than `timeout`.
    pub async fn probe(&self, host: &str, timeout: Duration) -> ProbeResult {
        match tokio::time::timeout(timeout, self.echo.echo(host, timeout)).await {
            Ok(Ok(rtt)) => ProbeResult::success(rtt),
            Ok(Err(e)) => ProbeResult::failure(classify(e)),
            Err(_elapsed) => ProbeResult::failure(ProbeErrorKind::Timeout),
        }
    }
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober").finish_non_exhaustive()
    }
}

fn classify(error: EchoError) -> ProbeErrorKind {
    match error {
        EchoError::Timeout => ProbeErrorKind::Timeout,
        EchoError::Resolution(_) => ProbeErrorKind::ResolutionFailed,
        EchoError::Transport(message) => ProbeErrorKind::Other(message),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
