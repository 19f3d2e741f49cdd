pub const OCTET_STREAM: &str = "application/octet-stream";

/// Types we always answer the same way, whatever the backend recorded.
fn known_type(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        ".html" => "text/html",
        ".css" => "text/css",
        ".js" => "application/javascript",
        ".json" => "application/json",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".svg" => "image/svg+xml",
        ".ico" => "image/x-icon",
        ".txt" => "text/plain",
        ".pdf" => "application/pdf",
        ".woff" => "font/woff",
        ".woff2" => "font/woff2",
        ".ttf" => "font/ttf",
        ".eot" => "application/vnd.ms-fontobject",
        _ => return None,
    };
    Some(mime)
}

/// Lowercase extension of the last segment, dot included, or "" if none.
fn extension(key: &str) -> String {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rfind('.') {
        Some(idx) => name[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Content type for an object key.
///
/// A trailing `?query` is ignored when the part before it already has an
/// extension, so `app.css?v=2` is CSS while a key like `what?.txt` keeps its
/// own extension. Falls back to the backend-reported type, then to the `mime_guess`
/// database, then to `application/octet-stream`.
pub fn content_type(key: &str, fallback: &str) -> String {
    let ext = match key.split_once('?') {
        Some((path, _)) if !extension(path).is_empty() => extension(path),
        _ => extension(key),
    };

    if let Some(mime) = known_type(&ext) {
        return mime.to_string();
    }
    if !fallback.is_empty() {
        return fallback.to_string();
    }

    ext.strip_prefix('.')
        .and_then(|e| mime_guess::from_ext(e).first())
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
