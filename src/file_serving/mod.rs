//! Request path → object key → HTTP response.

pub mod content_type;
pub mod fetch;
pub mod handlers;
pub mod path_utils;
pub mod spa;

pub use content_type::content_type;
pub use fetch::{FetchResult, FetchedObject, Fetcher};
pub use handlers::StaticMiddleware;
pub use path_utils::{normalize_root, resolve};
