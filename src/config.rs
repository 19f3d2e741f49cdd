use regex::Regex;

use crate::compression::Compressor;

/// Settings for one [`StaticMiddleware`](crate::file_serving::StaticMiddleware)
/// instance. Built once and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct StaticConfig {
    pub bucket: String,
    /// Request paths handed to the next handler untouched. Exact match.
    pub ignore_paths: Vec<String>,
    /// Anchored regexes, checked after `ignore_paths`.
    pub bypass_patterns: Vec<Regex>,
    pub spa: bool,
    /// Request prefix under which objects are served, e.g. `/static/`.
    pub root_path: String,
    pub enable_compression: bool,
    pub compression_level: u32,
    pub min_size_for_compression: u64,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            ignore_paths: Vec::new(),
            bypass_patterns: Vec::new(),
            spa: false,
            root_path: "/".to_string(),
            enable_compression: false,
            compression_level: 0,
            min_size_for_compression: 0,
        }
    }
}

impl StaticConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    pub fn compressor(&self) -> Compressor {
        Compressor::new(
            self.enable_compression,
            self.compression_level,
            self.min_size_for_compression,
        )
    }

    pub fn is_bypassed(&self, request_path: &str) -> bool {
        self.ignore_paths.iter().any(|p| p == request_path)
            || self
                .bypass_patterns
                .iter()
                .any(|re| re.is_match(request_path))
    }
}

/// Compiles bypass patterns, anchoring each so it must match the whole path.
pub fn parse_bypass_patterns(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("^(?:{})$", p)))
        .collect()
}
