//! Whole-document dialect detection and classification.

use rf_core::types::{ClassificationResult, Dialect};

use crate::parser::{AbpClassifier, LineClassifier, PlainClassifier};

static ABP: AbpClassifier = AbpClassifier;
static PLAIN: PlainClassifier = PlainClassifier;

/// Markers whose presence anywhere in a document selects the ABP dialect.
const ABP_MARKERS: [&str; 3] = ["||", "[Adblock", "##"];

pub fn detect_dialect(text: &str) -> Dialect {
    if ABP_MARKERS.iter().any(|marker| text.contains(marker)) {
        Dialect::Abp
    } else {
        Dialect::Plain
    }
}

pub fn classifier_for(dialect: Dialect) -> &'static dyn LineClassifier {
    match dialect {
        Dialect::Abp => &ABP,
        Dialect::Plain => &PLAIN,
    }
}

/// Detect the dialect once, route every line through its classifier and
/// apply the document-local allow override.
pub fn classify_document(text: &str) -> ClassificationResult {
    let dialect = detect_dialect(text);
    let classifier = classifier_for(dialect);
    let mut result = ClassificationResult::new(dialect);

    for line in text.lines() {
        result.lines += 1;
        match classifier.classify(line) {
            Some(classified) => result.insert(classified),
            None => result.ignored += 1,
        }
    }

    result.apply_allow_override();

    log::debug!(
        "classified {} lines as {}: {} exact, {} suffix, {} allow, {} ignored",
        result.lines,
        dialect,
        result.block_exact.len(),
        result.block_suffix.len(),
        result.allow_exact.len(),
        result.ignored
    );

    result
}
