//! IP-CIDR rule extraction.

use ipnet::IpNet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::Normalizer;
use crate::Grammar;

/// Leading dotted quad, then whatever follows.
static IPV4_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})(.*)$").unwrap()
});

/// `[hex:colons]` followed by whatever follows.
static IPV6_BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([0-9A-Fa-f:]+)\](.*)$").unwrap());

/// Leading run of hex digits and colons, then whatever follows.
static IPV6_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9A-Fa-f:]+)(.*)$").unwrap());

/// Leading `:port`.
static PORT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:[0-9]+").unwrap());

/// The whole remainder is `/prefix`.
static CIDR_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/([0-9]+)$").unwrap());

/// Address family of a captured address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    V4,
    V6,
}

impl Family {
    fn max_prefix(self) -> u32 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

/// IpNormalizer emits `address/prefix` CIDR rules.
///
/// Accepted token shapes, tried in order:
/// - `1.2.3.4`, `1.2.3.4/24`, `1.2.3.4:8080`, `1.2.3.4:8080/24`
/// - `[2001:db8::1]`, `[2001:db8::1]:443`, `[2001:db8::]/32`
/// - `2001:db8::1`, `2001:db8::/32`
///
/// A missing prefix defaults to the host prefix (32 or 128). IPv6
/// addresses must always parse as real addresses; IPv4 octets are only
/// range-checked in strict mode. IPv6 forms are skipped under
/// [`Grammar::Ipv4Only`].
///
/// # Examples
/// ```
/// use k2list::{Grammar, IpNormalizer, Normalizer};
///
/// let normalizer = IpNormalizer::new(Grammar::Full);
/// assert_eq!(normalizer.normalize("1.2.3.4:8080/24").as_deref(), Some("1.2.3.4/24"));
/// assert_eq!(normalizer.normalize("[2001:db8::1]:443").as_deref(), Some("2001:db8::1/128"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IpNormalizer {
    grammar: Grammar,
    strict: bool,
}

impl IpNormalizer {
    /// Create a new IpNormalizer for the given grammar.
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            strict: false,
        }
    }

    /// Also require IPv4 addresses to be real addresses (octet range checks).
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Split a token into address, family and the unparsed remainder.
    fn split_address<'a>(&self, token: &'a str) -> Option<(&'a str, Family, &'a str)> {
        if let Some(caps) = IPV4_PREFIX.captures(token) {
            let (_, [addr, rest]) = caps.extract();
            return Some((addr, Family::V4, rest));
        }

        if self.grammar == Grammar::Ipv4Only {
            return None;
        }

        if let Some(caps) = IPV6_BRACKETED.captures(token) {
            let (_, [addr, rest]) = caps.extract();
            return is_ipv6(addr).then_some((addr, Family::V6, rest));
        }

        if let Some(caps) = IPV6_BARE.captures(token) {
            let (_, [addr, rest]) = caps.extract();
            // Plain numbers and `host:port` pairs like `cafe:80` are not addresses
            return is_ipv6(addr).then_some((addr, Family::V6, rest));
        }

        None
    }

    /// Resolve the prefix length from the remainder after the address.
    fn prefix_len(rest: &str, family: Family) -> Option<u32> {
        let rest = match PORT_PREFIX.find(rest) {
            Some(m) => &rest[m.end()..],
            None => rest,
        };

        let prefix = if rest.is_empty() {
            family.max_prefix()
        } else {
            let caps = CIDR_SUFFIX.captures(rest)?;
            caps[1].parse::<u32>().ok()?
        };

        (prefix <= family.max_prefix()).then_some(prefix)
    }

    /// Check that the address is a real address and forms a valid network.
    fn is_real_network(addr: &str, family: Family, prefix: u32) -> bool {
        let ip: IpAddr = match family {
            Family::V4 => match addr.parse::<Ipv4Addr>() {
                Ok(v4) => v4.into(),
                Err(_) => return false,
            },
            Family::V6 => match addr.parse::<Ipv6Addr>() {
                Ok(v6) => v6.into(),
                Err(_) => return false,
            },
        };
        IpNet::new(ip, prefix as u8).is_ok()
    }
}

/// Hex-and-colon runs only count as IPv6 when they parse as an address.
fn is_ipv6(addr: &str) -> bool {
    addr.contains(':') && addr.parse::<Ipv6Addr>().is_ok()
}

impl Normalizer for IpNormalizer {
    fn normalize(&self, token: &str) -> Option<String> {
        let (addr, family, rest) = self.split_address(token)?;
        let prefix = Self::prefix_len(rest, family)?;

        if self.strict && !Self::is_real_network(addr, family, prefix) {
            return None;
        }

        Some(format!("{}/{}", addr, prefix))
    }

    fn name(&self) -> &'static str {
        "ip"
    }
}
