pub const INDEX_KEY: &str = "index.html";

/// Last path segment, ignoring trailing separators. An empty key has base
/// `.`, a key made only of separators has base `/`.
fn base(key: &str) -> &str {
    let trimmed = key.trim_end_matches('/');
    if trimmed.is_empty() {
        return if key.is_empty() { "." } else { "/" };
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Rewrites route-like keys to the index document of that route. A final
/// segment with a dot names a file and is kept as is.
pub fn route_key(key: &str) -> String {
    let base = base(key);
    if base == "." {
        return INDEX_KEY.to_string();
    }
    if base.contains('.') {
        return key.to_string();
    }

    let route = key.trim_matches('/');
    if route.is_empty() {
        INDEX_KEY.to_string()
    } else {
        format!("{}/{}", route, INDEX_KEY)
    }
}
