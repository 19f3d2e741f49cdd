use flate2::read::GzDecoder;
use std::io::Read;
use std::sync::Arc;

use bktserve::server::not_found;
use bktserve::{BoxHandler, MemoryStore, Middleware, Request, StaticConfig, StaticMiddleware};

fn handler(store: MemoryStore, config: StaticConfig) -> BoxHandler {
    StaticMiddleware::new(Arc::new(store), config).wrap(Arc::new(not_found))
}

fn large_html() -> String {
    let mut html = String::from("<!doctype html><html><body>");
    for i in 0..200 {
        html.push_str(&format!("<div class=\"row\">row {}</div>", i));
    }
    html.push_str("</body></html>");
    html
}

#[test]
fn spa_route_falls_back_to_index() {
    let index = "<!doctype html><div id=app></div>";
    let store = MemoryStore::new().with_object("site", "index.html", index);
    let config = StaticConfig {
        spa: true,
        root_path: "/app/".to_string(),
        ..StaticConfig::new("site")
    };

    let response = handler(store, config).handle(&Request::get("/app/dashboard"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, index.as_bytes());
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(
        response.header("Content-Length"),
        Some(index.len().to_string().as_str())
    );
}

#[test]
fn spa_route_prefers_its_own_index() {
    let store = MemoryStore::new()
        .with_object("site", "index.html", "root")
        .with_object("site", "docs/index.html", "docs");
    let config = StaticConfig {
        spa: true,
        ..StaticConfig::new("site")
    };

    let response = handler(store, config).handle(&Request::get("/docs"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"docs");
}

#[test]
fn missing_object_without_spa_is_404() {
    let store = MemoryStore::new().with_object("site", "index.html", "root");
    let response = handler(store, StaticConfig::new("site")).handle(&Request::get("/nope.css"));
    assert_eq!(response.status, 404);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Type"), None);
}

#[test]
fn large_html_is_gzipped_for_gzip_clients() {
    let html = large_html();
    let store = MemoryStore::new().with_object("site", "index.html", html.clone());
    let config = StaticConfig {
        enable_compression: true,
        min_size_for_compression: 1024,
        ..StaticConfig::new("site")
    };

    let response = handler(store, config)
        .handle(&Request::get("/index.html").with_header("Accept-Encoding", "gzip"));
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Encoding"), Some("gzip"));
    assert_eq!(response.header("Vary"), Some("Accept-Encoding"));
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(
        response.header("Content-Length"),
        Some(response.body.len().to_string().as_str())
    );

    let mut decoded = String::new();
    GzDecoder::new(&response.body[..])
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, html);
}

#[test]
fn spa_fallback_is_compressed_too() {
    let html = large_html();
    let store = MemoryStore::new().with_object("site", "index.html", html.clone());
    let config = StaticConfig {
        spa: true,
        enable_compression: true,
        min_size_for_compression: 1024,
        ..StaticConfig::new("site")
    };

    let response = handler(store, config)
        .handle(&Request::get("/settings/profile").with_header("Accept-Encoding", "gzip, deflate"));
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Encoding"), Some("gzip"));

    let mut decoded = String::new();
    GzDecoder::new(&response.body[..])
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, html);
}

#[test]
fn images_are_never_compressed() {
    let png = vec![0x89u8; 4096];
    let store = MemoryStore::new().with_object("site", "logo.png", png.clone());
    let config = StaticConfig {
        enable_compression: true,
        ..StaticConfig::new("site")
    };

    let response =
        handler(store, config).handle(&Request::get("/logo.png").with_header("Accept-Encoding", "gzip"));
    assert_eq!(response.header("Content-Type"), Some("image/png"));
    assert_eq!(response.header("Content-Encoding"), None);
    assert_eq!(response.body, png);
}

#[test]
fn backend_content_type_used_for_unknown_extensions() {
    let mut store = MemoryStore::new();
    store.insert("site", "manifest", "{}", "application/manifest+json");

    let response = handler(store, StaticConfig::new("site")).handle(&Request::get("/manifest"));
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("application/manifest+json"));
}

#[test]
fn bypassed_path_reaches_terminal_handler() {
    let store = MemoryStore::new().with_object("site", "healthz", "static copy");
    let config = StaticConfig {
        ignore_paths: vec!["/healthz".to_string()],
        ..StaticConfig::new("site")
    };

    let response = handler(store, config).handle(&Request::get("/healthz"));
    assert_eq!(response.status, 404);
    assert_eq!(response.body, b"Not Found");
}

#[test]
fn encoded_question_mark_names_the_object() {
    let store = MemoryStore::new().with_object("site", "what?.txt", "answer");
    let response =
        handler(store, StaticConfig::new("site")).handle(&Request::get("/what%3F.txt?x=1"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"answer");
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
}
