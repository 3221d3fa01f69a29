//! Session name normalization used for grouping.
//!
//! Grouping treats `_`, space and `-` as the same separator. Display always
//! keeps the raw name; because all three separators are single bytes, byte
//! offsets computed on a normalized name are valid on the raw name.

use std::collections::HashSet;
use std::path::Path;

/// Replace `_` and space with `-`.
pub fn normalize(name: &str) -> String {
    name.replace(['_', ' '], "-")
}

/// Sort key that places `<x>-main` / `<x>-master` directly after `<x>`.
///
/// `\x01` sorts below every printable character, so the main branch comes
/// before any other `<x>-...` sibling.
pub fn sort_key(name: &str) -> String {
    let norm = normalize(name);
    for suffix in ["main", "master"] {
        if let Some(stem) = norm.strip_suffix(suffix).and_then(|s| s.strip_suffix('-')) {
            return format!("{stem}\x01{suffix}");
        }
    }
    norm
}

/// Whether a session name ends in `-main` or `-master` (after normalization).
pub fn is_main_branch(name: &str) -> bool {
    let norm = normalize(name);
    norm.ends_with("-main") || norm.ends_with("-master")
}

/// Strip `<prefix>-` from `raw` when its normalized form starts with it.
///
/// `norm_prefix` must already be normalized. Returns `raw` unchanged when the
/// prefix does not match.
pub fn trim_normalized_prefix<'a>(raw: &'a str, norm_prefix: &str) -> &'a str {
    let norm = normalize(raw);
    let cut = norm_prefix.len() + 1;
    if norm.len() > norm_prefix.len()
        && norm.starts_with(norm_prefix)
        && norm.as_bytes()[norm_prefix.len()] == b'-'
    {
        &raw[cut..]
    } else {
        raw
    }
}

/// Longest dash-separated prefix of `norm_name` that is itself a known name.
///
/// `norm_name` and every entry of `names` must be normalized.
pub fn find_real_parent<'a>(norm_name: &'a str, names: &HashSet<String>) -> Option<&'a str> {
    let mut candidate = norm_name;
    while let Some(idx) = candidate.rfind('-') {
        candidate = &candidate[..idx];
        if !candidate.is_empty() && names.contains(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Whether a session name belongs to the repository rooted at `root`.
///
/// The normalized name must equal the normalized repository directory name,
/// or extend it with a `-` separated suffix.
pub fn name_matches_repo(session_name: &str, root: &Path) -> bool {
    let Some(base) = root.file_name() else {
        return false;
    };
    let norm_base = normalize(&base.to_string_lossy());
    let norm_name = normalize(session_name);

    norm_name == norm_base
        || (norm_name.len() > norm_base.len()
            && norm_name.starts_with(&norm_base)
            && norm_name.as_bytes()[norm_base.len()] == b'-')
}
