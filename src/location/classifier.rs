//! Non-routable address detection.
//!
//! Loopback, RFC 1918, IPv6 link-local (fe80::/10) and unique-local
//! (fc00::/7) addresses are never sent to the IP provider.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Strip an optional port suffix and IPv6 brackets.
///
/// `[::1]:1234` → `::1`, `10.0.0.1:30000` → `10.0.0.1`, `fe80::1` unchanged.
pub fn strip_port(address: &str) -> &str {
    let address = address.trim();
    if let Some(rest) = address.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &rest[..end],
            None => rest,
        };
    }
    // A single colon can only be an IPv4 port separator.
    match address.split_once(':') {
        Some((host, port)) if !port.contains(':') => host,
        _ => address,
    }
}

/// Whether the address is private, loopback or link-local.
///
/// Empty or malformed input is reported as public (`false`).
pub fn is_private(address: &str) -> bool {
    match strip_port(address).parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => is_private_v4(v4),
        Ok(IpAddr::V6(v6)) => is_private_v6(v6),
        Err(_) => false,
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    o[0] == 127
        || o[0] == 10
        || (o[0] == 172 && (16..=31).contains(&o[1]))
        || (o[0] == 192 && o[1] == 168)
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_private_v4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || first & 0xffc0 == 0xfe80
        || first & 0xfe00 == 0xfc00
}
