//! Rule-set rendering and verification.
//!
//! Output layout:
//!
//! ```text
//! # Sources:
//! # - <source> (+<n> exact, +<n> suffix, -<n> allow)
//! no_resolve: true
//! domain_set:
//! - <host>
//! domain_suffix_set:
//! - <host>
//! ```
//!
//! The comment block is diagnostic only; the three keys are the contract.

use serde::{Deserialize, Serialize};

use rf_core::host::{Host, HostError};

use crate::aggregator::{DomainSets, SourceOutcome, SourceReport};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no_resolve must be true")]
    ResolveEnabled,
    #[error("{key}[{index}] '{value}' is not a valid host: {source}")]
    InvalidHost {
        key: &'static str,
        index: usize,
        value: String,
        source: HostError,
    },
    #[error("{key}[{index}] '{value}' is not in canonical form (expected '{canonical}')")]
    NonCanonical {
        key: &'static str,
        index: usize,
        value: String,
        canonical: String,
    },
    #[error("{key} is not sorted at index {index}: '{prev}' >= '{next}'")]
    Unsorted {
        key: &'static str,
        index: usize,
        prev: String,
        next: String,
    },
}

/// Serialized shape of the output file. Field order is the key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    pub no_resolve: bool,
    pub domain_set: Vec<Host>,
    pub domain_suffix_set: Vec<Host>,
}

/// The file as written, before any host is normalized.
#[derive(Debug, Deserialize)]
struct RawRuleSet {
    no_resolve: bool,
    #[serde(default)]
    domain_set: Vec<String>,
    #[serde(default)]
    domain_suffix_set: Vec<String>,
}

impl RuleSet {
    pub fn from_domain_sets(sets: &DomainSets) -> Self {
        Self {
            no_resolve: true,
            domain_set: sets.domain_set.clone(),
            domain_suffix_set: sets.domain_suffix_set.clone(),
        }
    }

    /// Check the structural contract: `no_resolve` set and both lists
    /// strictly ascending (sorted and duplicate-free).
    pub fn verify(&self) -> Result<(), ExportError> {
        if !self.no_resolve {
            return Err(ExportError::ResolveEnabled);
        }
        check_ascending("domain_set", &self.domain_set)?;
        check_ascending("domain_suffix_set", &self.domain_suffix_set)?;
        Ok(())
    }
}

fn check_ascending(key: &'static str, hosts: &[Host]) -> Result<(), ExportError> {
    for (index, pair) in hosts.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            return Err(ExportError::Unsorted {
                key,
                index: index + 1,
                prev: pair[0].to_string(),
                next: pair[1].to_string(),
            });
        }
    }
    Ok(())
}

/// One `# - ...` comment line for a source.
pub fn source_note(report: &SourceReport) -> String {
    match &report.outcome {
        SourceOutcome::Classified {
            exact,
            suffix,
            allow,
            ..
        } => format!(
            "# - {} (+{} exact, +{} suffix, -{} allow)",
            report.source, exact, suffix, allow
        ),
        SourceOutcome::Failed { reason } => {
            // Keep multi-line error chains inside the comment.
            let reason = reason.replace(&['\r', '\n'][..], " ");
            format!("# - {} (error: {})", report.source, reason)
        }
    }
}

pub fn render_rule_set(sets: &DomainSets) -> Result<String, ExportError> {
    let mut out = String::from("# Sources:\n");
    for report in &sets.sources {
        out.push_str(&source_note(report));
        out.push('\n');
    }
    out.push_str(&serde_yaml::to_string(&RuleSet::from_domain_sets(sets))?);
    Ok(out)
}

/// Parse a previously rendered rule set. Every entry must already be a
/// canonical host: normalizing it must give back the same string.
pub fn parse_rule_set(text: &str) -> Result<RuleSet, ExportError> {
    let raw: RawRuleSet = serde_yaml::from_str(text)?;
    Ok(RuleSet {
        no_resolve: raw.no_resolve,
        domain_set: canonical_hosts("domain_set", raw.domain_set)?,
        domain_suffix_set: canonical_hosts("domain_suffix_set", raw.domain_suffix_set)?,
    })
}

fn canonical_hosts(key: &'static str, values: Vec<String>) -> Result<Vec<Host>, ExportError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match Host::parse(&value) {
            Ok(host) if host.as_str() == value => Ok(host),
            Ok(host) => Err(ExportError::NonCanonical {
                key,
                index,
                value,
                canonical: host.into_string(),
            }),
            Err(source) => Err(ExportError::InvalidHost {
                key,
                index,
                value,
                source,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::aggregator::{aggregate, Aggregator};
    use crate::detect::classify_document;

    use super::*;

    fn sample() -> DomainSets {
        let mut aggregator = Aggregator::new();
        aggregator.add("list-a", classify_document("||b.com^\n||a.com^\n@@||x.com^\n"));
        aggregator.add("list-b", classify_document("0.0.0.0 c.com\n"));
        aggregator.add_failure("list-c", "connection refused");
        aggregator.finish()
    }

    #[test]
    fn renders_header_and_keys_in_order() {
        let text = render_rule_set(&sample()).unwrap();

        assert!(text.starts_with("# Sources:\n"));
        assert!(text.contains("# - list-a (+0 exact, +2 suffix, -1 allow)\n"));
        assert!(text.contains("# - list-b (+1 exact, +0 suffix, -0 allow)\n"));
        assert!(text.contains("# - list-c (error: connection refused)\n"));

        let no_resolve = text.find("no_resolve: true").unwrap();
        let domain_set = text.find("domain_set:").unwrap();
        let suffix_set = text.find("domain_suffix_set:").unwrap();
        assert!(no_resolve < domain_set && domain_set < suffix_set);
        assert!(text.find("- a.com").unwrap() < text.find("- b.com").unwrap());
    }

    #[test]
    fn rendered_output_parses_back_and_verifies() {
        let sets = sample();
        let text = render_rule_set(&sets).unwrap();
        let parsed = parse_rule_set(&text).unwrap();

        assert_eq!(parsed, RuleSet::from_domain_sets(&sets));
        assert!(parsed.verify().is_ok());
    }

    #[test]
    fn empty_sets_render_as_empty_lists() {
        let text = render_rule_set(&aggregate(Vec::<(String, _)>::new())).unwrap();
        let parsed = parse_rule_set(&text).unwrap();
        assert!(parsed.no_resolve);
        assert!(parsed.domain_set.is_empty());
        assert!(parsed.domain_suffix_set.is_empty());
    }

    #[test]
    fn failure_notes_stay_on_one_line() {
        let mut aggregator = Aggregator::new();
        aggregator.add_failure("list", "first\nsecond");
        let text = render_rule_set(&aggregator.finish()).unwrap();
        assert!(text.contains("# - list (error: first second)\n"));
        assert!(parse_rule_set(&text).is_ok());
    }

    #[test]
    fn verify_rejects_unsorted_and_duplicates() {
        let unsorted = parse_rule_set("no_resolve: true\ndomain_set: [b.com, a.com]\n").unwrap();
        assert!(matches!(
            unsorted.verify(),
            Err(ExportError::Unsorted { key: "domain_set", index: 1, .. })
        ));

        let duplicate = parse_rule_set("no_resolve: true\ndomain_suffix_set: [a.com, a.com]\n").unwrap();
        assert!(matches!(
            duplicate.verify(),
            Err(ExportError::Unsorted { key: "domain_suffix_set", .. })
        ));

        let resolving = parse_rule_set("no_resolve: false\n").unwrap();
        assert!(matches!(resolving.verify(), Err(ExportError::ResolveEnabled)));
    }

    #[test]
    fn parse_rejects_invalid_hosts() {
        assert!(matches!(
            parse_rule_set("no_resolve: true\ndomain_set: [1.2.3.4]\n"),
            Err(ExportError::InvalidHost { key: "domain_set", index: 0, .. })
        ));
        assert!(matches!(
            parse_rule_set("no_resolve: true\ndomain_set: [localhost]\n"),
            Err(ExportError::InvalidHost { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_canonical_hosts() {
        let err = parse_rule_set("no_resolve: true\ndomain_set: ['*.Ads.COM:443']\n").unwrap_err();
        match err {
            ExportError::NonCanonical { key, index, value, canonical } => {
                assert_eq!(key, "domain_set");
                assert_eq!(index, 0);
                assert_eq!(value, "*.Ads.COM:443");
                assert_eq!(canonical, "ads.com");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            parse_rule_set("no_resolve: true\ndomain_suffix_set: [a.com, ' b.com']\n"),
            Err(ExportError::NonCanonical { key: "domain_suffix_set", index: 1, .. })
        ));
    }
}
