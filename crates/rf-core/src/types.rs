//! Core type definitions for rulefold
//!
//! These types describe what a single block-list line means and what one
//! classified document contributes to a run.

use std::collections::HashSet;

use crate::host::Host;

// =============================================================================
// Disposition
// =============================================================================

/// What a classified rule does to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Block the exact host only
    BlockExact,
    /// Block the host and every subdomain (||host^)
    BlockSuffix,
    /// Exception rule (@@...) - overrides any block of the exact host
    Allow,
}

impl Disposition {
    /// Map a block disposition to its exception counterpart when the rule
    /// carried an `@@` marker.
    #[inline]
    pub fn with_exception(self, is_exception: bool) -> Self {
        if is_exception {
            Self::Allow
        } else {
            self
        }
    }
}

// =============================================================================
// Dialect
// =============================================================================

/// Syntax family of a whole block-list document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Adblock-Plus-style filters (`||`, `@@`, `##`, ...)
    Abp,
    /// hosts-file lines or bare domains
    #[default]
    Plain,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Abp => "abp",
            Self::Plain => "plain",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Classified Line
// =============================================================================

/// A line that survived classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub disposition: Disposition,
    pub host: Host,
}

impl ClassifiedLine {
    pub fn new(disposition: Disposition, host: Host) -> Self {
        Self { disposition, host }
    }
}

// =============================================================================
// Classification Result
// =============================================================================

/// Everything one document contributes to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Dialect the document was read as
    pub dialect: Dialect,
    /// Exact-match block hosts
    pub block_exact: HashSet<Host>,
    /// Hosts blocked together with their subdomains
    pub block_suffix: HashSet<Host>,
    /// Hosts exempted from any block
    pub allow_exact: HashSet<Host>,
    /// Total lines seen
    pub lines: usize,
    /// Lines that produced nothing
    pub ignored: usize,
}

impl ClassificationResult {
    /// Create an empty result for a document of the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Record one classified line.
    pub fn insert(&mut self, line: ClassifiedLine) {
        let set = match line.disposition {
            Disposition::BlockExact => &mut self.block_exact,
            Disposition::BlockSuffix => &mut self.block_suffix,
            Disposition::Allow => &mut self.allow_exact,
        };
        set.insert(line.host);
    }

    /// Remove every allow-listed host from both block sets.
    pub fn apply_allow_override(&mut self) {
        if self.allow_exact.is_empty() {
            return;
        }
        let allow = &self.allow_exact;
        self.block_exact.retain(|host| !allow.contains(host));
        self.block_suffix.retain(|host| !allow.contains(host));
    }

    /// True when the document contributed no hosts at all.
    pub fn is_empty(&self) -> bool {
        self.block_exact.is_empty() && self.block_suffix.is_empty() && self.allow_exact.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(s: &str) -> Host {
        s.parse().expect("valid host")
    }

    #[test]
    fn test_with_exception() {
        assert_eq!(Disposition::BlockSuffix.with_exception(true), Disposition::Allow);
        assert_eq!(Disposition::BlockExact.with_exception(true), Disposition::Allow);
        assert_eq!(Disposition::BlockSuffix.with_exception(false), Disposition::BlockSuffix);
    }

    #[test]
    fn test_insert_routes_by_disposition() {
        let mut result = ClassificationResult::new(Dialect::Abp);
        result.insert(ClassifiedLine::new(Disposition::BlockExact, host("a.com")));
        result.insert(ClassifiedLine::new(Disposition::BlockSuffix, host("b.com")));
        result.insert(ClassifiedLine::new(Disposition::Allow, host("c.com")));
        result.insert(ClassifiedLine::new(Disposition::Allow, host("c.com")));

        assert!(result.block_exact.contains(&host("a.com")));
        assert!(result.block_suffix.contains(&host("b.com")));
        assert_eq!(result.allow_exact.len(), 1);
    }

    #[test]
    fn test_allow_override_removes_from_both_sets() {
        let mut result = ClassificationResult::new(Dialect::Abp);
        result.insert(ClassifiedLine::new(Disposition::BlockExact, host("a.com")));
        result.insert(ClassifiedLine::new(Disposition::BlockSuffix, host("a.com")));
        result.insert(ClassifiedLine::new(Disposition::BlockSuffix, host("b.com")));
        result.insert(ClassifiedLine::new(Disposition::Allow, host("a.com")));
        result.apply_allow_override();

        assert!(result.block_exact.is_empty());
        assert_eq!(result.block_suffix.len(), 1);
        assert!(result.block_suffix.contains(&host("b.com")));
        assert!(result.allow_exact.contains(&host("a.com")));
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::Abp.to_string(), "abp");
        assert_eq!(Dialect::Plain.to_string(), "plain");
    }
}
