use std::sync::Arc;
use std::time::Instant;

use super::fetch::{FetchedObject, Fetcher};
use super::path_utils::resolve;
use super::spa::INDEX_KEY;
use crate::compression::{negotiate, Compressor};
use crate::config::StaticConfig;
use crate::http::{BoxHandler, Handler, Middleware, Request, Response};
use crate::store::ObjectStore;

/// Serves objects from a bucket as a static file tree.
///
/// Paths listed in the config's bypass rules are handed to the wrapped
/// handler. Everything else is answered from the bucket, with a 404 when
/// neither the object nor (in SPA mode) the index document exists.
#[derive(Clone)]
pub struct StaticMiddleware {
    config: Arc<StaticConfig>,
    fetcher: Fetcher,
    compressor: Compressor,
}

impl StaticMiddleware {
    pub fn new(store: Arc<dyn ObjectStore>, config: StaticConfig) -> Self {
        let fetcher = Fetcher::new(store, config.bucket.clone());
        let compressor = config.compressor();
        Self {
            config: Arc::new(config),
            fetcher,
            compressor,
        }
    }

    pub fn serve(&self, request: &Request, next: &dyn Handler) -> Response {
        if self.config.is_bypassed(&request.path) {
            log::debug!("{} bypasses static serving", request.path);
            return next.handle(request);
        }

        let start_time = Instant::now();
        let key = resolve(&request.path, &self.config);
        let spa_fallback = self.config.spa && key != INDEX_KEY;
        let mut keys = vec![key];
        if spa_fallback {
            keys.push(INDEX_KEY.to_string());
        }

        let mut results = self.fetcher.fetch_many(&keys).into_iter();
        let primary = results.next();
        let fallback = results.next();

        let object = match primary {
            Some(Ok(object)) => object,
            Some(Err(e)) => {
                log::debug!("Primary fetch of {} failed: {}", keys[0], e);
                match fallback {
                    Some(Ok(index)) => {
                        log::debug!("Serving {} for {}", INDEX_KEY, request.path);
                        index
                    }
                    Some(Err(e)) => {
                        log::warn!("SPA fallback {} unavailable: {}", INDEX_KEY, e);
                        return Response::not_found();
                    }
                    None => return Response::not_found(),
                }
            }
            None => return Response::not_found(),
        };
        log::trace!("Selected object in {:?}", start_time.elapsed());

        self.respond(object, request.header("Accept-Encoding").unwrap_or(""))
    }

    fn respond(&self, object: FetchedObject, accept_encoding: &str) -> Response {
        let FetchedObject {
            body,
            content_type,
            size,
        } = object;

        if self.compressor.should_compress(&content_type, size) {
            if let Some(encoding) = negotiate(accept_encoding) {
                match self.compressor.compress(&body, encoding.as_str()) {
                    Ok(compressed) => {
                        let compressed_len = compressed.len();
                        let mut response = Response::ok(&content_type, compressed);
                        response.set_header("Content-Encoding", encoding.as_str());
                        response.set_header("Content-Length", &compressed_len.to_string());
                        response.set_header("Vary", "Accept-Encoding");
                        return response;
                    }
                    Err(e) => log::debug!("Serving uncompressed, {} failed: {}", encoding, e),
                }
            }
        }

        let length = body.len();
        let mut response = Response::ok(&content_type, body);
        response.set_header("Content-Length", &length.to_string());
        response
    }
}

struct ServeStatic {
    middleware: StaticMiddleware,
    next: BoxHandler,
}

impl Handler for ServeStatic {
    fn handle(&self, request: &Request) -> Response {
        self.middleware.serve(request, self.next.as_ref())
    }
}

impl Middleware for StaticMiddleware {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(ServeStatic {
            middleware: self.clone(),
            next,
        })
    }
}
