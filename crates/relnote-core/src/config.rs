use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RelnoteError, Result};

/// Deduplication engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub thresholds: DedupThresholds,
}

/// Similarity tiers used by the clustering classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupThresholds {
    /// Below this, two items are unrelated.
    pub uncertain: f64,
    /// At or above this, items are merged automatically as likely duplicates.
    pub duplicate: f64,
    /// At or above this, items are definite duplicates.
    pub definite: f64,
}

impl DedupThresholds {
    pub const UNCERTAIN: f64 = 0.4;
    pub const DUPLICATE: f64 = 0.6;
    pub const DEFINITE: f64 = 0.85;

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("uncertain", self.uncertain),
            ("duplicate", self.duplicate),
            ("definite", self.definite),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RelnoteError::InvalidThresholds(format!(
                    "{name} = {value} is outside [0, 1]"
                )));
            }
        }
        if !(self.uncertain < self.duplicate && self.duplicate < self.definite) {
            return Err(RelnoteError::InvalidThresholds(format!(
                "expected uncertain < duplicate < definite, got {} / {} / {}",
                self.uncertain, self.duplicate, self.definite
            )));
        }
        Ok(())
    }
}

impl Default for DedupThresholds {
    fn default() -> Self {
        Self {
            uncertain: Self::UNCERTAIN,
            duplicate: Self::DUPLICATE,
            definite: Self::DEFINITE,
        }
    }
}

impl DedupConfig {
    /// Parse a JSON config document, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DedupConfig = serde_json::from_str(json)?;
        config.thresholds.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dedup config {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}
