//! Configuration for encoding and retrieval.
//!
//! Both config structs validate at construction; an invalid combination
//! never reaches the pipeline. Environment-variable loading reads
//! `FRAMEVAULT_*` keys with fallback to the defaults module.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// QR error-correction level, in ascending redundancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QrEcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl std::fmt::Display for QrEcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L => write!(f, "L"),
            Self::M => write!(f, "M"),
            Self::Q => write!(f, "Q"),
            Self::H => write!(f, "H"),
        }
    }
}

impl FromStr for QrEcLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(Error::Config(format!(
                "Invalid QR error-correction level: {} (expected L, M, Q, or H)",
                s
            ))),
        }
    }
}

/// Configuration for the encode pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Sliding-window size in codepoints.
    pub chunk_size: usize,
    /// Overlap between consecutive windows, strictly below `chunk_size`.
    pub chunk_overlap: usize,
    /// Output MP4 frame rate.
    pub video_fps: u32,
    /// Square output frame edge in pixels.
    pub video_resolution: u32,
    /// QR error-correction level.
    pub error_correction: QrEcLevel,
    /// Concurrent rasterize+embed tasks. 0 means "available cores".
    pub parallelism: usize,
    /// Emit per-frame progress at WARN visibility instead of TRACE.
    pub verbose: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::CHUNK_SIZE,
            chunk_overlap: defaults::CHUNK_OVERLAP,
            video_fps: defaults::VIDEO_FPS,
            video_resolution: defaults::VIDEO_RESOLUTION,
            error_correction: QrEcLevel::default(),
            parallelism: 0,
            verbose: false,
        }
    }
}

impl EncodingConfig {
    /// Create a validated default configuration.
    pub fn new() -> Result<Self> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables with fallback to defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `FRAMEVAULT_CHUNK_SIZE` | 500 |
    /// | `FRAMEVAULT_CHUNK_OVERLAP` | 50 |
    /// | `FRAMEVAULT_VIDEO_FPS` | 1 |
    /// | `FRAMEVAULT_VIDEO_RESOLUTION` | 256 |
    /// | `FRAMEVAULT_QR_EC_LEVEL` | M |
    /// | `FRAMEVAULT_PARALLELISM` | 0 (cores) |
    /// | `FRAMEVAULT_VERBOSE` | false |
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FRAMEVAULT_CHUNK_SIZE") {
            config.chunk_size = val
                .parse()
                .map_err(|_| Error::Config(format!("Invalid FRAMEVAULT_CHUNK_SIZE: {}", val)))?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_CHUNK_OVERLAP") {
            config.chunk_overlap = val
                .parse()
                .map_err(|_| Error::Config(format!("Invalid FRAMEVAULT_CHUNK_OVERLAP: {}", val)))?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_VIDEO_FPS") {
            config.video_fps = val
                .parse()
                .map_err(|_| Error::Config(format!("Invalid FRAMEVAULT_VIDEO_FPS: {}", val)))?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_VIDEO_RESOLUTION") {
            config.video_resolution = val.parse().map_err(|_| {
                Error::Config(format!("Invalid FRAMEVAULT_VIDEO_RESOLUTION: {}", val))
            })?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_QR_EC_LEVEL") {
            config.error_correction = val.parse()?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_PARALLELISM") {
            config.parallelism = val
                .parse()
                .map_err(|_| Error::Config(format!("Invalid FRAMEVAULT_PARALLELISM: {}", val)))?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_VERBOSE") {
            config.verbose = val == "true" || val == "1";
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants; every constructor funnels through here.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.video_fps == 0 {
            return Err(Error::Config("video_fps must be positive".to_string()));
        }
        if self.video_resolution == 0 {
            return Err(Error::Config(
                "video_resolution must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Window stride in codepoints.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }

    /// Effective fan-out bound: configured value, or available cores
    /// capped by `ENCODE_MAX_PARALLELISM` when zero.
    pub fn effective_parallelism(&self) -> usize {
        if self.parallelism > 0 {
            return self.parallelism;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(defaults::ENCODE_MAX_PARALLELISM)
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_error_correction(mut self, level: QrEcLevel) -> Self {
        self.error_correction = level;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.video_resolution = resolution;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Configuration for the retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// LRU capacity of the decoded-frame cache.
    pub max_cache_size: usize,
    /// Emit per-frame decode failures at WARN visibility.
    pub verbose: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            max_cache_size: defaults::FRAME_CACHE_SIZE,
            verbose: false,
        }
    }
}

impl RetrieverConfig {
    pub fn new() -> Result<Self> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load from `FRAMEVAULT_CACHE_SIZE` / `FRAMEVAULT_VERBOSE`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FRAMEVAULT_CACHE_SIZE") {
            config.max_cache_size = val
                .parse()
                .map_err(|_| Error::Config(format!("Invalid FRAMEVAULT_CACHE_SIZE: {}", val)))?;
        }
        if let Ok(val) = std::env::var("FRAMEVAULT_VERBOSE") {
            config.verbose = val == "true" || val == "1";
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_cache_size == 0 {
            return Err(Error::Config("max_cache_size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec_level_display() {
        assert_eq!(QrEcLevel::L.to_string(), "L");
        assert_eq!(QrEcLevel::M.to_string(), "M");
        assert_eq!(QrEcLevel::Q.to_string(), "Q");
        assert_eq!(QrEcLevel::H.to_string(), "H");
    }

    #[test]
    fn test_ec_level_from_str() {
        assert_eq!("l".parse::<QrEcLevel>().unwrap(), QrEcLevel::L);
        assert_eq!("M".parse::<QrEcLevel>().unwrap(), QrEcLevel::M);
        assert_eq!("q".parse::<QrEcLevel>().unwrap(), QrEcLevel::Q);
        assert_eq!("H".parse::<QrEcLevel>().unwrap(), QrEcLevel::H);

        let result = "X".parse::<QrEcLevel>();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_ec_level_default_is_m() {
        assert_eq!(QrEcLevel::default(), QrEcLevel::M);
    }

    #[test]
    fn test_encoding_config_defaults() {
        let config = EncodingConfig::new().unwrap();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.video_fps, 1);
        assert_eq!(config.video_resolution, 256);
        assert_eq!(config.error_correction, QrEcLevel::M);
        assert!(!config.verbose);
    }

    #[test]
    fn test_encoding_config_rejects_overlap_ge_size() {
        let config = EncodingConfig::default().with_chunking(100, 100);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = EncodingConfig::default().with_chunking(100, 150);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_encoding_config_rejects_zero_fields() {
        let mut config = EncodingConfig::default();
        config.video_fps = 0;
        assert!(config.validate().is_err());

        let mut config = EncodingConfig::default();
        config.video_resolution = 0;
        assert!(config.validate().is_err());

        let mut config = EncodingConfig::default();
        config.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_encoding_config_stride() {
        let config = EncodingConfig::default().with_chunking(10, 2);
        assert_eq!(config.stride(), 8);
    }

    #[test]
    fn test_effective_parallelism_positive() {
        let config = EncodingConfig::default();
        assert!(config.effective_parallelism() >= 1);

        let mut explicit = EncodingConfig::default();
        explicit.parallelism = 3;
        assert_eq!(explicit.effective_parallelism(), 3);
    }

    #[test]
    fn test_retriever_config_defaults() {
        let config = RetrieverConfig::new().unwrap();
        assert_eq!(config.max_cache_size, 50);
        assert!(!config.verbose);
    }

    #[test]
    fn test_retriever_config_rejects_zero_cache() {
        let config = RetrieverConfig::default().with_cache_size(0);
        assert!(config.validate().is_err());
    }
}
