use std::borrow::Cow;

use super::spa;
use crate::config::StaticConfig;

/// Makes sure the root prefix starts and ends with `/`. Empty roots become `/`.
pub fn normalize_root(root_path: &str) -> Cow<'_, str> {
    match (root_path.starts_with('/'), root_path.ends_with('/')) {
        (true, true) => Cow::Borrowed(root_path),
        (true, false) => Cow::Owned(format!("{}/", root_path)),
        (false, true) => Cow::Owned(format!("/{}", root_path)),
        (false, false) if root_path.is_empty() => Cow::Borrowed("/"),
        (false, false) => Cow::Owned(format!("/{}/", root_path)),
    }
}

/// Maps a request path to the object key it should be served from.
///
/// `request_path` is the decoded path without its query string, as in
/// [`Request::path`](crate::http::Request::path); a `?` in it is part of the
/// key. The normalized root prefix is removed once, then SPA rules apply
/// when enabled.
pub fn resolve(request_path: &str, config: &StaticConfig) -> String {
    let root = normalize_root(&config.root_path);
    let key = request_path.replacen(&*root, "", 1);

    let resolved = if config.spa {
        spa::route_key(&key)
    } else {
        key
    };
    log::trace!("Resolved {} to key {:?}", request_path, resolved);
    resolved
}
