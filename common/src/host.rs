//! # Host Identifiers
//!
//! A monitored host is identified by a plain string. Two forms are accepted:
//! * A dotted-quad IPv4 address (e.g., `192.168.1.1`), always.
//! * A DNS host name (e.g., `gateway.lan`), only when the caller opts in.
//!
//! Identity is the exact string: `"Gateway.lan"` and `"gateway.lan"` are two
//! different hosts.

use std::net::Ipv4Addr;

use crate::error::HostError;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Returns `true` for exactly four dot-separated decimal octets in `0..=255`.
pub fn is_valid_host(s: &str) -> bool {
    parse_ipv4(s).is_some()
}

/// Reads a dotted quad as four decimal octets.
///
/// Leading zeros are tolerated and still decimal: `"10.0.0.010"` is
/// `10.0.0.10`. Neither `std` nor the system resolver reads it that way, so
/// this is the only parser the engine uses for literal addresses.
pub fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');

    for slot in &mut octets {
        *slot = parse_octet(parts.next()?)?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(Ipv4Addr::from(octets)),
    }
}

fn parse_octet(octet: &str) -> Option<u8> {
    if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overlong digit runs overflow u16 and fail.
    octet.parse::<u16>().ok().and_then(|value| u8::try_from(value).ok())
}

/// Returns `true` for an RFC 1123 host name.
///
/// Labels are 1-63 alphanumerics or hyphens, never starting or ending with a
/// hyphen. All-numeric names are rejected so malformed addresses like
/// `10.0.0` never slip through as "names".
pub fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    let labels_ok = s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });

    let has_alpha = s.bytes().any(|b| b.is_ascii_alphabetic());
    labels_ok && has_alpha
}

/// Validates a host identifier, returning [`HostError::InvalidFormat`] on failure.
pub fn validate_host(s: &str, allow_hostnames: bool) -> Result<(), HostError> {
    if is_valid_host(s) || (allow_hostnames && is_valid_hostname(s)) {
        Ok(())
    } else {
        Err(HostError::InvalidFormat(s.to_string()))
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
