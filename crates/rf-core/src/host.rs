//! Host normalization
//!
//! Every domain that reaches a rule set passes through [`Host::parse`]:
//!
//! ```
//! use rf_core::host::Host;
//!
//! let host: Host = "*.Ads.Example.com:443".parse().unwrap();
//! assert_eq!(host.as_str(), "ads.example.com");
//! assert!("192.168.0.1".parse::<Host>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ABP characters that terminate the host part of a `||` rule.
pub const ABP_SEPARATORS: &[char] = &['^', '/', '*', '?', '|'];

/// Reason a candidate was not accepted as a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("empty host")]
    Empty,
    #[error("host has no dot")]
    MissingDot,
    #[error("host contains '/'")]
    ContainsSlash,
    #[error("host is an IPv4 literal")]
    IpLiteral,
}

/// A normalized domain name.
///
/// Lowercase, no leading `.` or wildcard, no `:port`, at least one `.`,
/// no `/`, and never an IPv4 dotted quad.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Host(String);

impl Host {
    /// Normalize `raw` and validate the result.
    pub fn parse(raw: &str) -> Result<Self, HostError> {
        let host = normalize_host(raw);
        validate(&host)?;
        Ok(Self(host))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate(host: &str) -> Result<(), HostError> {
    if host.is_empty() {
        return Err(HostError::Empty);
    }
    if host.contains('/') {
        return Err(HostError::ContainsSlash);
    }
    if !host.contains('.') {
        return Err(HostError::MissingDot);
    }
    if is_ip_literal(host) {
        return Err(HostError::IpLiteral);
    }
    Ok(())
}

impl FromStr for Host {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Host {
    type Error = HostError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Host> for String {
    fn from(host: Host) -> Self {
        host.0
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Canonicalize a raw host token without validating it.
///
/// Trims, lowercases, drops one leading `.`, strips any leading run of `*`,
/// `.` and whitespace (wildcard prefix) and truncates at the first `:`. The
/// result may be empty.
pub fn normalize_host(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut host = lowered.as_str();
    if let Some(rest) = host.strip_prefix('.') {
        host = rest;
    }
    host = host.trim_start_matches(|c: char| c == '*' || c == '.' || c.is_whitespace());
    if let Some(colon) = host.find(':') {
        host = host[..colon].trim_end();
    }
    host.to_string()
}

/// Matches four groups of ASCII digits separated by `.`, nothing else.
pub fn is_ip_literal(host: &str) -> bool {
    let mut groups = 0;
    for part in host.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    groups == 4
}

/// Prefix of `s` up to the first ABP separator, or all of `s`.
#[inline]
pub fn take_until_separator(s: &str) -> &str {
    match s.find(ABP_SEPARATORS) {
        Some(pos) => &s[..pos],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wildcard_and_port() {
        assert_eq!(normalize_host("*.Ads.Example.com:443"), "ads.example.com");
        assert_eq!(normalize_host("  .tracker.net  "), "tracker.net");
        assert_eq!(normalize_host("**..x.org"), "x.org");
        assert_eq!(normalize_host("*"), "");
        assert_eq!(normalize_host("ads.com :8080"), "ads.com");
        assert_eq!(normalize_host("*. ads.com"), "ads.com");
        assert_eq!(normalize_host(". .ads.com"), "ads.com");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["ads.example.com", "*.A.b.C:80", ".x.y", "a-b_c.d", "*. ads.com", ". .ads.com"] {
            let once = normalize_host(raw);
            assert_eq!(normalize_host(&once), once);
        }
    }

    #[test]
    fn test_parse_accepts_domain() {
        let host = Host::parse("*.Ads.Example.com:443").unwrap();
        assert_eq!(host.as_str(), "ads.example.com");
        assert_eq!(Host::parse(host.as_str()).unwrap(), host);
    }

    #[test]
    fn test_parse_never_keeps_leading_whitespace() {
        for raw in ["*. ads.com", ". .ads.com", "*.\t*.ads.com"] {
            let host = Host::parse(raw).unwrap();
            assert_eq!(host.as_str(), "ads.com");
            assert_eq!(normalize_host(host.as_str()), host.as_str());
        }
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Host::parse("192.168.0.1"), Err(HostError::IpLiteral));
        assert_eq!(Host::parse("0.0.0.0:53"), Err(HostError::IpLiteral));
        assert_eq!(Host::parse("localhost"), Err(HostError::MissingDot));
        assert_eq!(Host::parse("example.com/ads"), Err(HostError::ContainsSlash));
        assert_eq!(Host::parse("   "), Err(HostError::Empty));
        assert_eq!(Host::parse("*."), Err(HostError::Empty));
    }

    #[test]
    fn test_is_ip_literal() {
        assert!(is_ip_literal("127.0.0.1"));
        assert!(is_ip_literal("999.999.999.999"));
        assert!(!is_ip_literal("1.2.3"));
        assert!(!is_ip_literal("1.2.3.4.5"));
        assert!(!is_ip_literal("1.2.3.a"));
        assert!(!is_ip_literal("1..2.3"));
    }

    #[test]
    fn test_take_until_separator() {
        assert_eq!(take_until_separator("doubleclick.net^"), "doubleclick.net");
        assert_eq!(take_until_separator("ads.com/banner"), "ads.com");
        assert_eq!(take_until_separator("ads.com|"), "ads.com");
        assert_eq!(take_until_separator("ads.com$third-party"), "ads.com$third-party");
        assert_eq!(take_until_separator("^"), "");
    }

    #[test]
    fn test_serde_revalidates() {
        let host: Host = serde_json::from_str("\"Ads.Example.com\"").unwrap();
        assert_eq!(host.as_str(), "ads.example.com");
        assert!(serde_json::from_str::<Host>("\"10.0.0.1\"").is_err());
        assert_eq!(serde_json::to_string(&host).unwrap(), "\"ads.example.com\"");
    }
}
