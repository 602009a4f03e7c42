// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Application context shared by every command.

use std::sync::Arc;

use crate::config::CodeDnaConfig;
use crate::error::{CodeDnaResult, ErrorReporter, ErrorReporting, TracingErrorReporter};
use crate::store::IdentityStore;

/// Everything a command needs: validated configuration, the opened identity
/// store, and where survivable errors are reported.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<CodeDnaConfig>,
    pub store: Arc<IdentityStore>,
    pub reporting: ErrorReporting,
}

impl AppContext {
    /// Opens the configured store and reports errors through tracing.
    pub fn new(config: CodeDnaConfig) -> CodeDnaResult<Self> {
        let store = IdentityStore::open(&config.store.path)?;
        Ok(Self::with_parts(
            config,
            store,
            Arc::new(TracingErrorReporter),
        ))
    }

    /// Assembles a context from already-built parts.
    pub fn with_parts(
        config: CodeDnaConfig,
        store: IdentityStore,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            reporting: ErrorReporting::new(reporter),
        }
    }
}
