use std::collections::HashSet;

use serde::Serialize;

use rf_core::host::Host;
use rf_core::types::ClassificationResult;

/// What one source contributed, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Classified {
        dialect: &'static str,
        exact: usize,
        suffix: usize,
        allow: usize,
    },
    Failed {
        reason: String,
    },
}

/// Final merged output of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainSets {
    /// Exact-match hosts, ascending
    pub domain_set: Vec<Host>,
    /// Hosts covering their subdomains, ascending
    pub domain_suffix_set: Vec<Host>,
    /// Size of the global allow set
    pub allow_count: usize,
    pub sources: Vec<SourceReport>,
}

/// Merges per-document results for one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    block_exact: HashSet<Host>,
    block_suffix: HashSet<Host>,
    allow_exact: HashSet<Host>,
    sources: Vec<SourceReport>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: impl Into<String>, result: ClassificationResult) {
        let outcome = SourceOutcome::Classified {
            dialect: result.dialect.as_str(),
            exact: result.block_exact.len(),
            suffix: result.block_suffix.len(),
            allow: result.allow_exact.len(),
        };
        self.sources.push(SourceReport {
            source: source.into(),
            outcome,
        });

        self.block_exact.extend(result.block_exact);
        self.block_suffix.extend(result.block_suffix);
        self.allow_exact.extend(result.allow_exact);
    }

    /// A source that could not be fetched or parsed contributes no hosts.
    pub fn add_failure(&mut self, source: impl Into<String>, reason: impl Into<String>) {
        self.sources.push(SourceReport {
            source: source.into(),
            outcome: SourceOutcome::Failed {
                reason: reason.into(),
            },
        });
    }

    /// Apply the global allow override and sort.
    pub fn finish(self) -> DomainSets {
        let Self {
            block_exact,
            block_suffix,
            allow_exact,
            sources,
        } = self;

        DomainSets {
            domain_set: sorted_without(block_exact, &allow_exact),
            domain_suffix_set: sorted_without(block_suffix, &allow_exact),
            allow_count: allow_exact.len(),
            sources,
        }
    }
}

fn sorted_without(set: HashSet<Host>, remove: &HashSet<Host>) -> Vec<Host> {
    let mut hosts: Vec<Host> = set.into_iter().filter(|h| !remove.contains(h)).collect();
    hosts.sort_unstable();
    hosts
}

/// Merge `(source, result)` pairs into the final sorted sets.
pub fn aggregate<I, S>(results: I) -> DomainSets
where
    I: IntoIterator<Item = (S, ClassificationResult)>,
    S: Into<String>,
{
    let mut aggregator = Aggregator::new();
    for (source, result) in results {
        aggregator.add(source, result);
    }
    aggregator.finish()
}
