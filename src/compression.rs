use flate2::write::GzEncoder;
use flate2::Compression as GzipCompression;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_GZIP_LEVEL: u32 = 6;

// Text and structured-data types only.
const COMPRESSIBLE_TYPES: &[&str] = &[
    "text/html",
    "text/css",
    "text/plain",
    "text/xml",
    "application/javascript",
    "application/json",
    "application/xml",
    "application/x-javascript",
    "application/ld+json",
];

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("{0} compression not implemented")]
    NotImplemented(&'static str),

    #[error("unsupported encoding: {0}")]
    Unsupported(String),

    #[error("compression failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ContentEncoding {
    Brotli,
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Brotli => "br",
            ContentEncoding::Gzip => "gzip",
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentEncoding {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "br" => Ok(ContentEncoding::Brotli),
            "gzip" => Ok(ContentEncoding::Gzip),
            other => Err(CompressionError::Unsupported(other.to_string())),
        }
    }
}

/// Coding name of one `Accept-Encoding` entry, or `None` when its q-value
/// is zero (explicitly refused) or unparsable.
fn accepted_coding(entry: &str) -> Option<&str> {
    let mut parts = entry.split(';');
    let coding = parts.next().unwrap_or("").trim();
    for param in parts {
        if let Some((name, value)) = param.split_once('=') {
            if name.trim() == "q" {
                let q: f32 = value.trim().parse().ok()?;
                if q <= 0.0 {
                    return None;
                }
            }
        }
    }
    Some(coding)
}

/// Picks the response encoding from an `Accept-Encoding` value.
///
/// `br` wins over `gzip` when the client accepts both. Codings sent with
/// `q=0` are treated as refused.
pub fn negotiate(accept_encoding: &str) -> Option<ContentEncoding> {
    let binding = accept_encoding.to_lowercase();
    let encodings: Vec<&str> = binding.split(',').filter_map(accepted_coding).collect();
    if encodings.iter().any(|&e| e == "br") {
        Some(ContentEncoding::Brotli)
    } else if encodings.iter().any(|&e| e == "gzip") {
        Some(ContentEncoding::Gzip)
    } else {
        None
    }
}

pub fn is_compressible(content_type: &str) -> bool {
    COMPRESSIBLE_TYPES.contains(&content_type)
}

/// Compression policy for one middleware instance.
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    pub enabled: bool,
    /// 1-9. Zero means unset and falls back to [`DEFAULT_GZIP_LEVEL`].
    pub level: u32,
    pub min_size: u64,
}

impl Compressor {
    pub fn new(enabled: bool, level: u32, min_size: u64) -> Self {
        Self {
            enabled,
            level,
            min_size,
        }
    }

    pub fn gzip_level(&self) -> u32 {
        match self.level {
            0 => DEFAULT_GZIP_LEVEL,
            level => level.min(9),
        }
    }

    pub fn should_compress(&self, content_type: &str, size: u64) -> bool {
        if !self.enabled {
            return false;
        }
        if size < self.min_size {
            return false;
        }
        is_compressible(content_type)
    }

    pub fn compress(&self, data: &[u8], encoding: &str) -> Result<Vec<u8>, CompressionError> {
        match encoding.parse::<ContentEncoding>()? {
            ContentEncoding::Gzip => {
                log::debug!(
                    "Compressing {} bytes with gzip level {}",
                    data.len(),
                    self.gzip_level()
                );
                let mut encoder =
                    GzEncoder::new(Vec::new(), GzipCompression::new(self.gzip_level()));
                encoder.write_all(data)?;
                Ok(encoder.finish()?)
            }
            ContentEncoding::Brotli => Err(CompressionError::NotImplemented("brotli")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn compressor() -> Compressor {
        Compressor::new(true, 6, 1024)
    }

    #[test]
    fn negotiate_prefers_brotli() {
        assert_eq!(negotiate("gzip, deflate, br"), Some(ContentEncoding::Brotli));
        assert_eq!(negotiate("gzip;q=1.0, identity"), Some(ContentEncoding::Gzip));
        assert_eq!(negotiate("GZIP"), Some(ContentEncoding::Gzip));
        assert_eq!(negotiate("deflate"), None);
        assert_eq!(negotiate(""), None);
    }

    #[test]
    fn negotiate_skips_refused_codings() {
        assert_eq!(negotiate("gzip;q=0"), None);
        assert_eq!(negotiate("gzip;q=0, identity"), None);
        assert_eq!(negotiate("gzip; q=0.000"), None);
        assert_eq!(negotiate("br;q=0, gzip;q=0.5"), Some(ContentEncoding::Gzip));
        assert_eq!(negotiate("gzip;q=bogus"), None);
    }

    #[test]
    fn should_compress_checks_each_condition() {
        let c = compressor();
        assert!(c.should_compress("text/html", 2048));
        assert!(c.should_compress("application/javascript", 1024));

        let disabled = Compressor::new(false, 6, 1024);
        assert!(!disabled.should_compress("text/html", 2048));

        assert!(!c.should_compress("text/html", 512));

        assert!(!c.should_compress("image/jpeg", 2048));
        assert!(!c.should_compress("font/woff2", 2048));
        assert!(!c.should_compress("application/octet-stream", 2048));
        assert!(!c.should_compress("", 2048));
    }

    #[test]
    fn gzip_round_trips() {
        let data = "Hello, World! ".repeat(200);
        let compressed = compressor().compress(data.as_bytes(), "gzip").unwrap();
        assert!(compressed.len() < data.len());

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn gzip_handles_empty_and_incompressible_input() {
        let c = compressor();
        let empty = c.compress(b"", "gzip").unwrap();
        let mut out = Vec::new();
        GzDecoder::new(&empty[..]).read_to_end(&mut out).unwrap();
        assert!(out.is_empty());

        // gzip framing overhead is bounded for stored blocks
        let noise: Vec<u8> = (0..4096u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
            .collect();
        let compressed = c.compress(&noise, "gzip").unwrap();
        assert!(compressed.len() <= noise.len() + 64);
    }

    #[test]
    fn brotli_is_not_implemented() {
        let err = compressor().compress(b"data", "br").unwrap_err();
        assert!(matches!(err, CompressionError::NotImplemented("brotli")));
        assert_eq!(err.to_string(), "brotli compression not implemented");
    }

    #[test]
    fn unknown_encoding_is_unsupported() {
        let err = compressor().compress(b"data", "deflate").unwrap_err();
        assert!(matches!(err, CompressionError::Unsupported(ref e) if e == "deflate"));
    }

    #[test]
    fn zero_level_means_default() {
        assert_eq!(Compressor::new(true, 0, 0).gzip_level(), DEFAULT_GZIP_LEVEL);
        assert_eq!(Compressor::new(true, 9, 0).gzip_level(), 9);
        assert_eq!(Compressor::new(true, 1, 0).gzip_level(), 1);
    }
}
