//! Serve an object storage bucket as a static site, with SPA fallback and
//! gzip for text assets.

pub mod args;
pub mod compression;
pub mod config;
pub mod file_serving;
pub mod http;
pub mod logging;
pub mod server;
pub mod store;

pub use config::StaticConfig;
pub use file_serving::StaticMiddleware;
pub use http::{BoxHandler, Handler, Middleware, Request, Response};
pub use store::{DirectoryStore, MemoryStore, ObjectStore, StoreError};
