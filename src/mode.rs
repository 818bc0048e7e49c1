//! Processing mode and grammar selection.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Mode selects which normalizers a list is fed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Every data line goes to the domain normalizer only
    Domain,
    /// Every data line goes to the IP normalizer only
    Ip,
    /// Every data line is offered to both normalizers, with two outputs
    Mixed,
}

impl Mode {
    /// Parse a mode from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "domain" | "domains" => Some(Mode::Domain),
            "ip" | "ipcidr" | "ip-cidr" => Some(Mode::Ip),
            "mixed" => Some(Mode::Mixed),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Domain => "domain",
            Mode::Ip => "ip",
            Mode::Mixed => "mixed",
        }
    }

    /// Whether data lines in this mode reach the domain normalizer.
    pub fn wants_domains(&self) -> bool {
        matches!(self, Mode::Domain | Mode::Mixed)
    }

    /// Whether data lines in this mode reach the IP normalizer.
    pub fn wants_ips(&self) -> bool {
        matches!(self, Mode::Ip | Mode::Mixed)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::parse(s).ok_or_else(|| Error::InvalidMode(s.to_string()))
    }
}

/// Grammar picks between the two historical line grammars.
///
/// `Full` accepts IPv6 (bare and bracketed) and excludes every
/// digits-and-dots token from domain output. `Ipv4Only` is the older
/// variant: IPv4 addresses only, and a looser domain grammar that also
/// allows `_` in labels and only excludes complete dotted quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grammar {
    #[default]
    Full,
    Ipv4Only,
}

impl Grammar {
    /// Parse a grammar from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" | "ipv6" => Some(Grammar::Full),
            "ipv4-only" | "ipv4only" | "ipv4" | "legacy" => Some(Grammar::Ipv4Only),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grammar::Full => "full",
            Grammar::Ipv4Only => "ipv4-only",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grammar::parse(s).ok_or_else(|| Error::InvalidGrammar(s.to_string()))
    }
}

/// Where header comments go in mixed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderPolicy {
    /// Header comments are written to the domain output only
    #[default]
    Domain,
    /// Header comments are duplicated to both outputs
    Both,
}

impl HeaderPolicy {
    /// Parse a header policy from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "domain" => Some(HeaderPolicy::Domain),
            "both" => Some(HeaderPolicy::Both),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderPolicy::Domain => "domain",
            HeaderPolicy::Both => "both",
        }
    }
}

impl fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HeaderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeaderPolicy::parse(s).ok_or_else(|| Error::InvalidHeaderPolicy(s.to_string()))
    }
}
