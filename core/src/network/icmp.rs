use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hostwatch_common::host::parse_ipv4;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use tracing::debug;

use super::{EchoError, EchoPrimitive};

const PAYLOAD: [u8; 8] = *b"hostwtch";

/// ICMP echo over the system's ping sockets.
///
/// Unprivileged datagram sockets are used where the kernel allows them;
/// otherwise raw sockets, which require root.
#[derive(Debug, Default, Clone, Copy)]
pub struct IcmpEcho;

impl IcmpEcho {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EchoPrimitive for IcmpEcho {
    async fn echo(&self, host: &str, timeout: Duration) -> Result<Duration, EchoError> {
        let addr = resolve_host(host).await?;

        let config = match addr {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        let client = Client::new(&config)
            .map_err(|e| EchoError::Transport(format!("failed to open ICMP socket: {e}")))?;

        let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_, rtt)) => {
                debug!(host, %addr, rtt_ms = rtt.as_secs_f64() * 1000.0, "Echo reply");
                Ok(rtt)
            }
            Err(SurgeError::Timeout { .. }) => Err(EchoError::Timeout),
            Err(e) => Err(EchoError::Transport(e.to_string())),
        }
    }
}

/// Resolves `host` to its first address, parsing literal addresses directly.
///
/// Dotted quads go through [`parse_ipv4`] first: handed to the system
/// resolver, `010` would be read as octal and a different machine probed.
async fn resolve_host(host: &str) -> Result<IpAddr, EchoError> {
    if let Some(addr) = parse_ipv4(host) {
        return Ok(IpAddr::V4(addr));
    }
    if let Ok(addr) = host.parse::<IpAddr>() {
        return Ok(addr);
    }

    let mut addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|_| EchoError::Resolution(host.to_string()))?;

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| EchoError::Resolution(host.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
