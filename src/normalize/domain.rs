//! Domain-suffix rule extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Normalizer;
use crate::Grammar;

/// Trailing `:port` suffix.
static PORT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r":[0-9]+$").unwrap());

/// Optional leading dot, then one or more non-empty labels.
static DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.?[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*$").unwrap());

/// Older, looser label grammar that also admits underscores.
static DOMAIN_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.?[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*$").unwrap());

/// Digits and dots only, i.e. something IP-shaped.
static DIGITS_AND_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9.]+$").unwrap());

/// A complete dotted quad.
static DOTTED_QUAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,3}(?:\.[0-9]{1,3}){3}$").unwrap());

/// DomainNormalizer emits suffix rules covering a domain and all of its
/// subdomains.
///
/// # Output Format
/// - `example.com` becomes `+.example.com`
/// - `.example.com` becomes `+.example.com`
/// - `org` (a bare TLD) becomes `+.org`
///
/// # Examples
/// ```
/// use k2list::{DomainNormalizer, Grammar, Normalizer};
///
/// let normalizer = DomainNormalizer::new(Grammar::Full);
/// assert_eq!(normalizer.normalize("ads.example.com:443").as_deref(), Some("+.ads.example.com"));
/// assert_eq!(normalizer.normalize("1.2.3.4"), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainNormalizer {
    grammar: Grammar,
}

impl DomainNormalizer {
    /// Create a new DomainNormalizer for the given grammar.
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    /// Check the label grammar.
    fn is_valid_host(&self, host: &str) -> bool {
        match self.grammar {
            Grammar::Full => DOMAIN.is_match(host),
            Grammar::Ipv4Only => DOMAIN_LOOSE.is_match(host),
        }
    }

    /// Check whether a host that passed the label grammar is really an IP.
    fn looks_like_ip(&self, host: &str) -> bool {
        let bare = host.strip_prefix('.').unwrap_or(host);
        match self.grammar {
            Grammar::Full => DIGITS_AND_DOTS.is_match(bare),
            Grammar::Ipv4Only => DOTTED_QUAD.is_match(bare),
        }
    }
}

impl Normalizer for DomainNormalizer {
    fn normalize(&self, token: &str) -> Option<String> {
        let host = match PORT_SUFFIX.find(token) {
            Some(m) => &token[..m.start()],
            None => token,
        };

        if !self.is_valid_host(host) || self.looks_like_ip(host) {
            return None;
        }

        if host.starts_with('.') {
            Some(format!("+{}", host))
        } else {
            Some(format!("+.{}", host))
        }
    }

    fn name(&self) -> &'static str {
        "domain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(token: &str) -> Option<String> {
        DomainNormalizer::new(Grammar::Full).normalize(token)
    }

    fn legacy(token: &str) -> Option<String> {
        DomainNormalizer::new(Grammar::Ipv4Only).normalize(token)
    }

    #[test]
    fn test_plain_domain() {
        assert_eq!(full("example.com").as_deref(), Some("+.example.com"));
        assert_eq!(full("a-b.c-d.example.co.uk").as_deref(), Some("+.a-b.c-d.example.co.uk"));
        assert_eq!(full("Ads.Example.COM").as_deref(), Some("+.Ads.Example.COM"));
    }

    #[test]
    fn test_leading_dot() {
        assert_eq!(full(".example.com").as_deref(), Some("+.example.com"));
        assert_eq!(full(".org").as_deref(), Some("+.org"));
    }

    #[test]
    fn test_bare_tld() {
        assert_eq!(full("org").as_deref(), Some("+.org"));
        assert_eq!(full("localhost").as_deref(), Some("+.localhost"));
    }

    #[test]
    fn test_port_stripped() {
        assert_eq!(full("example.com:8080").as_deref(), Some("+.example.com"));
        assert_eq!(full("example.com:").as_deref(), None);
        assert_eq!(full("example.com:http"), None);
    }

    #[test]
    fn test_ip_literals_rejected() {
        assert_eq!(full("1.2.3.4"), None);
        assert_eq!(full("1.2.3.4:80"), None);
        assert_eq!(full(".1.2.3.4"), None);
        assert_eq!(full("123"), None);
        assert_eq!(full("1.2.3"), None);
    }

    #[test]
    fn test_digits_with_letters_accepted() {
        assert_eq!(full("123.com").as_deref(), Some("+.123.com"));
        assert_eq!(full("1.2.3.4.nip.io").as_deref(), Some("+.1.2.3.4.nip.io"));
    }

    #[test]
    fn test_malformed_rejected() {
        assert_eq!(full(""), None);
        assert_eq!(full("."), None);
        assert_eq!(full("..example.com"), None);
        assert_eq!(full("example..com"), None);
        assert_eq!(full("example.com."), None);
        assert_eq!(full("example.com/malware.rar"), None);
        assert_eq!(full("http://example.com"), None);
        assert_eq!(full("*.example.com"), None);
        assert_eq!(full("under_score.example.com"), None);
        assert_eq!(full("2001:db8::1"), None);
        assert_eq!(full("bücher.de"), None);
    }

    #[test]
    fn test_idempotent_on_host_portion() {
        for token in ["example.com", ".example.com", "org", "x-1.y"] {
            let once = full(token).unwrap();
            let host = once.strip_prefix("+.").unwrap();
            assert_eq!(full(host).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_legacy_grammar() {
        assert_eq!(legacy("under_score.example.com").as_deref(), Some("+.under_score.example.com"));
        assert_eq!(legacy("123").as_deref(), Some("+.123"));
        assert_eq!(legacy("1.2.3").as_deref(), Some("+.1.2.3"));
        assert_eq!(legacy("1.2.3.4"), None);
        assert_eq!(legacy("1.2.3.4:53"), None);
        assert_eq!(legacy("example..com"), None);
    }
}
