//! Merge configuration

use serde::{Deserialize, Serialize};

use crate::error::DiarizationError;

/// Chunk merge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Length of one chunk window in seconds; also the offset step between chunks
    pub chunk_size: f64,
    /// Intentional overlap between adjacent chunks in seconds
    ///
    /// Accepted and reported, but overlap deduplication cuts at the previous
    /// chunk's `offset + chunk_size` and does not read this value.
    pub overlap: f64,
    /// Minimum cosine similarity (exclusive) to reuse a global speaker
    pub threshold: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3600.0,
            overlap: 30.0,
            threshold: 0.85,
        }
    }
}

impl MergeConfig {
    pub fn validate(&self) -> Result<(), DiarizationError> {
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(DiarizationError::InvalidConfig(format!(
                "chunk_size must be a positive number of seconds, got {}",
                self.chunk_size
            )));
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 {
            return Err(DiarizationError::InvalidConfig(format!(
                "overlap must be zero or more seconds, got {}",
                self.overlap
            )));
        }
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(DiarizationError::InvalidConfig(format!(
                "threshold must lie in [-1, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MergeConfig::default();
        assert_eq!(config.chunk_size, 3600.0);
        assert_eq!(config.overlap, 30.0);
        assert_eq!(config.threshold, 0.85);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: MergeConfig = serde_json::from_str(r#"{"threshold": 0.7}"#).unwrap();
        assert_eq!(config.threshold, 0.7);
        assert_eq!(config.chunk_size, 3600.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            MergeConfig { chunk_size: 0.0, ..Default::default() },
            MergeConfig { chunk_size: f64::NAN, ..Default::default() },
            MergeConfig { overlap: -1.0, ..Default::default() },
            MergeConfig { threshold: 1.5, ..Default::default() },
            MergeConfig { threshold: f64::NAN, ..Default::default() },
        ];
        for config in &bad {
            assert!(matches!(
                config.validate(),
                Err(DiarizationError::InvalidConfig(_))
            ));
        }
    }
}
