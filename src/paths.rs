// Helper functions for virtual instance paths

/// Normalizes a directory path into its canonical form.
///
/// Collapses repeated separators, strips any trailing separator and
/// guarantees exactly one leading `/`. The empty string maps to the root
/// `"/"`. Dot segments are kept verbatim; resolving them is the agent's
/// business.
///
/// The function is pure and idempotent, so callers may normalize
/// defensively without changing an already canonical path.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    out.push('/');
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        if out.len() > 1 {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// Joins an entry name onto a directory path and normalizes the result.
pub fn join(dir: &str, name: &str) -> String {
    normalize(&format!("{}/{}", dir, name))
}

/// Splits a path into parent directory and final segment, normalizing
/// first. The root yields `("/", "")`.
pub fn split(path: &str) -> (String, String) {
    let norm = normalize(path);
    let idx = norm.rfind('/').unwrap_or(0);
    let name = norm[idx + 1..].to_string();
    let parent = if idx == 0 { "/".to_string() } else { norm[..idx].to_string() };
    (parent, name)
}
