//! rulefold Block List Compiler
//!
//! This crate classifies ABP, hosts and plain-domain block lists and merges
//! them into the `domain_set` / `domain_suffix_set` rule set.

pub mod parser;
pub mod detect;
pub mod aggregator;
pub mod export;

pub use aggregator::{aggregate, Aggregator, DomainSets, SourceOutcome, SourceReport};
pub use detect::{classify_document, detect_dialect};
pub use export::{parse_rule_set, render_rule_set, ExportError, RuleSet};
pub use parser::{classify_abp, classify_plain, AbpClassifier, LineClassifier, PlainClassifier};
