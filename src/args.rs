use clap::Parser;
use std::path::PathBuf;

use crate::config::{parse_bypass_patterns, StaticConfig};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long)]
    pub listen_addr: String,

    /// Directory holding one subdirectory per bucket
    #[arg(short, long)]
    pub storage_root: PathBuf,

    #[arg(short, long)]
    pub bucket: String,

    /// Request prefix under which the bucket is served
    #[arg(short, long, default_value = "/")]
    pub root_path: String,

    /// Serve index.html for paths that match no object
    #[arg(long)]
    pub spa: bool,

    /// Exact request path passed through untouched (repeatable)
    #[arg(long = "ignore-path", value_name = "PATH")]
    pub ignore_paths: Vec<String>,

    /// Regex matched against the whole request path (repeatable)
    #[arg(long = "bypass-pattern", value_name = "REGEX")]
    pub bypass_patterns: Vec<String>,

    #[arg(long)]
    pub compression: bool,

    /// gzip level, 0 picks the default of 6
    #[arg(long, default_value = "6", value_parser = clap::value_parser!(u32).range(0..=9))]
    pub compression_level: u32,

    /// Smallest body in bytes worth compressing
    #[arg(long, default_value = "1024")]
    pub min_compress_size: u64,
}

impl Args {
    pub fn static_config(&self) -> Result<StaticConfig, regex::Error> {
        Ok(StaticConfig {
            bucket: self.bucket.clone(),
            ignore_paths: self.ignore_paths.clone(),
            bypass_patterns: parse_bypass_patterns(&self.bypass_patterns)?,
            spa: self.spa,
            root_path: self.root_path.clone(),
            enable_compression: self.compression,
            compression_level: self.compression_level,
            min_size_for_compression: self.min_compress_size,
        })
    }
}
