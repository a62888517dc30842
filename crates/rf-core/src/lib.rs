//! rulefold Core Library
//!
//! Shared types for turning heterogeneous ad/tracker block lists into one
//! canonical domain classification for DNS-level filtering.
//!
//! # Modules
//!
//! - `host`: Host normalization and the validated [`Host`] type
//! - `url`: Hostname extraction from URL-shaped rules
//! - `types`: Dispositions, dialects and per-document results
//!
//! Nothing in this crate performs I/O.

pub mod host;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use host::{is_ip_literal, normalize_host, take_until_separator, Host, HostError};
pub use types::{ClassificationResult, ClassifiedLine, Dialect, Disposition};
pub use url::extract_hostname;
