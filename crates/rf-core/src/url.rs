//! URL hostname extraction
//!
//! Works directly on string slices. Only the authority part of a URL is
//! ever looked at; paths and queries are irrelevant to DNS-level rules.

// =============================================================================
// Scheme
// =============================================================================

/// True for lowercase `http://` and `https://` prefixes.
#[inline]
pub fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Get the position after "://".
#[inline]
pub fn get_scheme_end(url: &str) -> Option<usize> {
    let bytes = url.as_bytes();

    let colon_pos = bytes.iter().position(|&b| b == b':')?;

    if bytes.len() > colon_pos + 2
        && bytes[colon_pos + 1] == b'/'
        && bytes[colon_pos + 2] == b'/'
    {
        return Some(colon_pos + 3);
    }

    None
}

// =============================================================================
// Host Extraction
// =============================================================================

/// Bytes that end the authority. `^`, `|` and `$` are ABP separators
/// that show up in `|https://host^$options` filters.
#[inline]
fn is_authority_end(b: u8) -> bool {
    matches!(b, b'/' | b'?' | b'#' | b'^' | b'|' | b'$')
}

/// Authority (`user@host:port`) slice of a URL.
#[inline]
pub fn extract_authority(url: &str) -> Option<&str> {
    let scheme_end = get_scheme_end(url)?;
    let rest = &url[scheme_end..];
    let end = rest
        .bytes()
        .position(is_authority_end)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Hostname of a URL: userinfo and port removed, IPv6 brackets unwrapped,
/// lowercased. `None` when the URL has no authority or an empty host.
pub fn extract_hostname(url: &str) -> Option<String> {
    let authority = extract_authority(url)?;

    // Handle userinfo
    let host_port = match authority.rfind('@') {
        Some(at_pos) => &authority[at_pos + 1..],
        None => authority,
    };

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        let close = bracketed.find(']')?;
        &bracketed[..close]
    } else {
        match host_port.find(':') {
            Some(colon) => &host_port[..colon],
            None => host_port,
        }
    };

    if host.is_empty() {
        return None;
    }
    Some(host.to_lowercase())
}
