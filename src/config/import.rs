// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Batch import configuration.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Batch import settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportConfig {
    /// Repositories fingerprinted concurrently
    pub workers: usize,

    /// Skip sources that are already stored
    pub skip_existing: bool,

    /// Directory searched for `<owner>_<repo>.txt` commit listings
    pub history_dir: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            skip_existing: true,
            history_dir: PathBuf::from("histories"),
        }
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 {
            return Err(ConfigError::ValidationError(
                "import.workers must be greater than 0".to_string(),
            ));
        }
        if self.history_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("import.history_dir".to_string()));
        }
        Ok(())
    }
}
