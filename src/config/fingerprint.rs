// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Fingerprint encoding configuration.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use crate::lineage::DEFAULT_PREFIX_LENGTH;
use serde::{Deserialize, Serialize};

/// How commit hashes are sampled into lineage symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Leading bits kept from each commit hash
    pub prefix_length: u8,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            prefix_length: DEFAULT_PREFIX_LENGTH,
        }
    }
}

impl Validate for FingerprintConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(1..=8).contains(&self.prefix_length) {
            return Err(ConfigError::ValueOutOfRange {
                key: "fingerprint.prefix_length".to_string(),
                message: format!("{} is not between 1 and 8", self.prefix_length),
            });
        }
        Ok(())
    }
}
