use crate::error::{Error, Result};
use crate::validation::{is_valid_ip, Target};
use std::net::IpAddr;
use trippy::dns::{Config, DnsResolver, Resolver};

/// Resolves `target` to the address that will be traced.
///
/// IP literals are returned as-is without touching DNS. Hostnames go through
/// the system resolver and the first IPv4 address wins.
pub fn resolve(target: &Target) -> Result<IpAddr> {
    let not_resolvable = || Error::NotResolvable {
        target: target.to_string(),
    };
    if is_valid_ip(target.as_str()) {
        return target.as_str().parse().map_err(|_| not_resolvable());
    }
    if target.as_str().is_empty() {
        return Err(not_resolvable());
    }

    let resolver = DnsResolver::start(Config::default()).map_err(|e| {
        log::warn!("failed to start the DNS resolver: {e}");
        not_resolvable()
    })?;
    let addrs: Vec<IpAddr> = resolver
        .lookup(target.as_str())
        .map_err(|e| {
            log::debug!("lookup of {target} failed: {e}");
            not_resolvable()
        })?
        .into_iter()
        .collect();
    log::debug!("{target} resolved to {addrs:?}");

    let addr = pick_address(&addrs).ok_or_else(not_resolvable)?;
    if addrs.len() > 1 {
        eprintln!("Warning: {target} has multiple addresses; using {addr}");
    }
    Ok(addr)
}

fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}
