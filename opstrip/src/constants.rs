//! Centralized limits for the sanitizer.
//!
//! # Environment Variables
//!
//! | Variable                 | Default          | Description                      |
//! |--------------------------|------------------|----------------------------------|
//! | `OPSTRIP_MAX_DEPTH`      | 32               | Maximum document nesting depth   |
//! | `OPSTRIP_MAX_JSON_SIZE`  | 1 MB (1,000,000) | Maximum textual JSON input size  |
//!
//! Both values are read once on first use and cached for the lifetime of the
//! process.

use std::sync::OnceLock;

/// Reserved prefix marking an operator key in the MongoDB catalog.
pub const OPERATOR_PREFIX: char = '$';

/// Maximum number of categories a single group can hold (one bit each).
pub const MAX_CATEGORIES: usize = 64;

// ============================================================================
// DOCUMENT LIMITS
// ============================================================================

/// Default maximum document nesting depth.
///
/// The top-level container is depth 1. Query documents built by real
/// data-access layers rarely exceed 10 levels.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum textual JSON input size (1MB).
pub const DEFAULT_MAX_JSON_SIZE: usize = 1_000_000;

static MAX_DEPTH_CACHE: OnceLock<usize> = OnceLock::new();
static MAX_JSON_SIZE_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the process-wide maximum nesting depth.
///
/// Reads `OPSTRIP_MAX_DEPTH` on first call and falls back to
/// [`DEFAULT_MAX_DEPTH`] if unset, unparsable or zero.
#[inline]
pub fn max_depth() -> usize {
    *MAX_DEPTH_CACHE.get_or_init(|| env_limit("OPSTRIP_MAX_DEPTH", DEFAULT_MAX_DEPTH))
}

/// Returns the process-wide maximum textual JSON input size in bytes.
///
/// Reads `OPSTRIP_MAX_JSON_SIZE` on first call and falls back to
/// [`DEFAULT_MAX_JSON_SIZE`] if unset, unparsable or zero.
#[inline]
pub fn max_json_size() -> usize {
    *MAX_JSON_SIZE_CACHE
        .get_or_init(|| env_limit("OPSTRIP_MAX_JSON_SIZE", DEFAULT_MAX_JSON_SIZE))
}

fn env_limit(var: &str, default: usize) -> usize {
    parse_limit(std::env::var(var).ok().as_deref(), default)
}

fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|&v: &usize| v > 0)
        .unwrap_or(default)
}
