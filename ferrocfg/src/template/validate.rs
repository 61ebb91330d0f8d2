//! Shared checks for addresses, masks, VLAN lists and free text.

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

type Result<T> = std::result::Result<T, ValidationError>;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,32}$").expect("valid name regex"));

static FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,128}$").expect("valid file regex"));

/// Longest description a device will store on an interface or VLAN.
pub const MAX_DESCRIPTION: usize = 240;

/// True for masks of the form 1…10…0.
pub fn is_contiguous_mask(mask: Ipv4Addr) -> bool {
    let bits = u32::from(mask);
    bits.leading_ones() + bits.trailing_zeros() == 32
}

/// Convert a subnet mask into the inverse (wildcard) form.
pub fn wildcard(mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(!u32::from(mask))
}

/// Build a network from an address and contiguous mask, rejecting host bits.
pub fn network(field: &str, addr: Ipv4Addr, mask: Ipv4Addr) -> Result<Ipv4Network> {
    let net = Ipv4Network::with_netmask(addr, mask)
        .map_err(|_| ValidationError::new(format!("{field} has an invalid subnet mask")))?;
    if net.network() != addr {
        return Err(ValidationError::new(format!(
            "{field} {addr} is not a network address for mask {mask}"
        )));
    }
    Ok(net)
}

/// Build an interface address: host bits must be set, but not all of them.
pub fn host_address(field: &str, addr: Ipv4Addr, mask: Ipv4Addr) -> Result<Ipv4Network> {
    let net = Ipv4Network::with_netmask(addr, mask)
        .map_err(|_| ValidationError::new(format!("{field} has an invalid subnet mask")))?;
    if net.prefix() < 31 && (addr == net.network() || addr == net.broadcast()) {
        return Err(ValidationError::new(format!(
            "{field} {addr} is not a usable host address"
        )));
    }
    Ok(net)
}

/// Accept either a wildcard mask or a subnet mask, returning the subnet mask.
///
/// `0.0.0.0` and `255.255.255.255` read both ways; they are taken as wildcards,
/// the form network statements use.
pub fn mask_or_wildcard(field: &str, value: Ipv4Addr) -> Result<Ipv4Addr> {
    let inverted = wildcard(value);
    if is_contiguous_mask(inverted) {
        return Ok(inverted);
    }
    if is_contiguous_mask(value) {
        return Ok(value);
    }
    Err(ValidationError::new(format!(
        "{field} mask {value} is neither a subnet nor a wildcard mask"
    )))
}

/// Parse one advertised network: `a.b.c.d/nn` or `a.b.c.d <mask|wildcard>`.
pub fn parse_network(field: &str, entry: &str) -> Result<Ipv4Network> {
    let entry = entry.trim();
    let invalid =
        || ValidationError::new(format!("{field} entry '{entry}' is not a valid network"));

    if let Some((addr, prefix)) = entry.split_once('/') {
        let addr: Ipv4Addr = addr.trim().parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.trim().parse().map_err(|_| invalid())?;
        let net = Ipv4Network::new(addr, prefix).map_err(|_| invalid())?;
        return network(field, addr, net.mask());
    }

    let mut parts = entry.split_whitespace();
    let (Some(addr), Some(mask), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
    let mask: Ipv4Addr = mask.parse().map_err(|_| invalid())?;
    network(field, addr, mask_or_wildcard(field, mask)?)
}

/// Parse a list of networks separated by commas, semicolons or newlines.
pub fn parse_networks(field: &str, value: &str) -> Result<Vec<Ipv4Network>> {
    let mut networks = Vec::new();
    for entry in value.split([',', ';', '\n']) {
        if entry.trim().is_empty() {
            continue;
        }
        let net = parse_network(field, entry)?;
        if !networks.contains(&net) {
            networks.push(net);
        }
    }
    if networks.is_empty() {
        return Err(ValidationError::new(format!(
            "{field} must list at least one network"
        )));
    }
    Ok(networks)
}

/// Parse a VLAN list such as `10,20,30-32` into a sorted, deduplicated set.
pub fn parse_vlan_list(field: &str, value: &str, max: u16) -> Result<Vec<u16>> {
    let parse_one = |s: &str| -> Result<u16> {
        let s = s.trim();
        let id: i64 = s
            .parse()
            .map_err(|_| ValidationError::new(format!("{field} entry '{s}' is not a number")))?;
        vlan_id(field, id, max)
    };

    let mut ids = Vec::new();
    for item in value.split([',', ' ', ';']).filter(|s| !s.trim().is_empty()) {
        match item.split_once('-') {
            Some((lo, hi)) => {
                let (lo, hi) = (parse_one(lo)?, parse_one(hi)?);
                if lo > hi {
                    return Err(ValidationError::new(format!(
                        "{field} range {lo}-{hi} is reversed"
                    )));
                }
                ids.extend(lo..=hi);
            }
            None => ids.push(parse_one(item)?),
        }
    }
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err(ValidationError::new(format!(
            "{field} must list at least one VLAN"
        )));
    }
    Ok(ids)
}

/// Render a sorted VLAN set compactly: `[10, 20, 21, 22]` → `10,20-22`.
pub fn compress_vlans(ids: &[u16]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = ids.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        match end - start {
            0 => parts.push(start.to_string()),
            1 => {
                parts.push(start.to_string());
                parts.push(end.to_string());
            }
            _ => parts.push(format!("{start}-{end}")),
        }
    }
    parts.join(",")
}

/// Check a VLAN ID against 1..=max.
pub fn vlan_id(field: &str, id: i64, max: u16) -> Result<u16> {
    if !(1..=i64::from(max)).contains(&id) {
        return Err(ValidationError::new(format!(
            "{field} must be between 1 and {max}"
        )));
    }
    Ok(id as u16)
}

/// VLAN, pool and profile names: 1 to 32 of `A-Z a-z 0-9 _ . -`.
pub fn name(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if !NAME_RE.is_match(value) {
        return Err(ValidationError::new(format!(
            "{field} may only contain letters, digits, '_', '.' or '-' (max 32)"
        )));
    }
    Ok(value.to_string())
}

/// Free-text descriptions: no control characters, bounded length.
pub fn description(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(format!(
            "{field} must not contain control characters"
        )));
    }
    if value.chars().count() > MAX_DESCRIPTION {
        return Err(ValidationError::new(format!(
            "{field} must be at most {MAX_DESCRIPTION} characters"
        )));
    }
    Ok(value.to_string())
}

/// Image file names fetched from a file server.
pub fn file_name(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if !FILE_RE.is_match(value) || value.starts_with('.') {
        return Err(ValidationError::new(format!("{field} is not a valid file name")));
    }
    Ok(value.to_string())
}

/// Reject addresses that cannot be a host: unspecified, broadcast, multicast, loopback.
pub fn unicast(field: &str, addr: Ipv4Addr) -> Result<Ipv4Addr> {
    if addr.is_unspecified() || addr.is_broadcast() || addr.is_multicast() || addr.is_loopback() {
        return Err(ValidationError::new(format!(
            "{field} {addr} is not a unicast address"
        )));
    }
    Ok(addr)
}
