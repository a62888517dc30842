use rf_core::host::{take_until_separator, Host};
use rf_core::types::{ClassifiedLine, Disposition};
use rf_core::url::{extract_hostname, is_http_url};

/// Interprets one line of a block-list document.
///
/// Returning `None` means the line is ignored: comments, cosmetic rules,
/// unsupported shapes and rejected hosts all end up here.
pub trait LineClassifier {
    fn classify(&self, line: &str) -> Option<ClassifiedLine>;
}

/// Adblock-Plus-style network filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbpClassifier;

/// hosts-file entries and bare domains. Always yields `BlockExact`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainClassifier;

impl LineClassifier for AbpClassifier {
    fn classify(&self, line: &str) -> Option<ClassifiedLine> {
        let (disposition, host) = classify_abp(line)?;
        Some(ClassifiedLine::new(disposition, host))
    }
}

impl LineClassifier for PlainClassifier {
    fn classify(&self, line: &str) -> Option<ClassifiedLine> {
        classify_plain(line).map(|host| ClassifiedLine::new(Disposition::BlockExact, host))
    }
}

// =============================================================================
// ABP dialect
// =============================================================================

pub fn classify_abp(line: &str) -> Option<(Disposition, Host)> {
    let line = line.trim();
    if line.is_empty() || is_abp_comment(line) || is_cosmetic_rule(line) || is_regex_rule(line) {
        return None;
    }

    let (is_exception, body) = match line.strip_prefix("@@") {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let (disposition, candidate) = if let Some(rest) = body.strip_prefix("||") {
        (Disposition::BlockSuffix, take_until_separator(rest).to_string())
    } else if body.starts_with("|http") {
        (Disposition::BlockExact, extract_hostname(body.trim_start_matches('|'))?)
    } else if is_http_url(body) {
        (Disposition::BlockExact, extract_hostname(body)?)
    } else if is_bare_host_token(body) {
        (Disposition::BlockExact, body.to_string())
    } else {
        return None;
    };

    let host = Host::parse(&candidate).ok()?;
    Some((disposition.with_exception(is_exception), host))
}

fn is_abp_comment(line: &str) -> bool {
    line.starts_with('!') || line.starts_with("[Adblock")
}

fn is_cosmetic_rule(line: &str) -> bool {
    line.contains("##") || line.contains("#@#") || line.contains("#?$#")
}

fn is_regex_rule(line: &str) -> bool {
    line.len() > 2 && line.starts_with('/') && line.ends_with('/')
}

/// `[A-Za-z0-9*_.-]+`
fn is_bare_host_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'*' | b'_' | b'.' | b'-'))
}

// =============================================================================
// hosts / plain dialect
// =============================================================================

pub fn classify_plain(line: &str) -> Option<Host> {
    let line = line.trim();
    if line.is_empty() || is_plain_comment(line) {
        return None;
    }

    let mut token = line.split_whitespace().last()?;

    if let Some(rest) = token.strip_prefix("||") {
        token = take_until_separator(rest);
    }
    if let Some(rest) = token.strip_suffix('^') {
        token = rest;
    }

    if is_http_url(token) {
        let hostname = extract_hostname(token)?;
        return Host::parse(&hostname).ok();
    }

    Host::parse(token).ok()
}

fn is_plain_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';') || line.starts_with("//") || line.starts_with('!')
}
