//! Helpers for sanitizing data before it enters log lines and span fields.
//!
//! Connection strings carry credentials and content paths can reveal the
//! layout of the storage volume; these keep both out of shared logs.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Masks the password of a connection string.
///
/// - `postgres://app:secret@db:5432/shop` → `postgres://app:****@db:5432/shop`
/// - `postgres://token@db/shop` → `postgres://****@db/shop`
/// - `sqlite::memory:` → unchanged
pub fn redact_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let scheme = &url[..scheme_end + 3];
    let rest = &url[scheme_end + 3..];

    // Userinfo ends at the last '@' before the path starts.
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at_pos) = rest[..authority_end].rfind('@') else {
        return url.to_string();
    };

    let userinfo = &rest[..at_pos];
    let after_at = &rest[at_pos + 1..];
    match userinfo.find(':') {
        Some(colon) => format!("{}{}:****@{}", scheme, &userinfo[..colon], after_at),
        None => format!("{}****@{}", scheme, after_at),
    }
}
