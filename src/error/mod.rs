// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error module for CodeDNA.
//!
//! This module provides the error handling framework for the application:
//! one `thiserror` enum per subsystem, aggregated into [`CodeDnaError`], plus
//! an [`ErrorContext`] and [`ErrorReporter`] for failures that are logged
//! and survived rather than propagated.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use thiserror::Error;
use tracing_error::SpanTrace;

use crate::data_structures::similarity_trie::SimilarityTrieError;
use crate::lineage::LineageError;

pub mod config;
pub mod import;
pub mod store;

/// Result type alias used throughout CodeDNA.
pub type CodeDnaResult<T> = Result<T, CodeDnaError>;

/// Core error enum for CodeDNA.
#[derive(Error, Debug)]
pub enum CodeDnaError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by the similarity trie or tree.
    #[error("Similarity tree error: {0}")]
    Trie(#[from] SimilarityTrieError),

    /// Errors deriving or parsing fingerprints.
    #[error("Fingerprint error: {0}")]
    Lineage(#[from] LineageError),

    /// Errors from the identity store.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    /// Errors from the batch importer.
    #[error("Import error: {0}")]
    Import(#[from] import::ImportError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: CodeDnaError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,

    /// Span trace at the point the context was built, if captured.
    pub trace: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<E: Into<CodeDnaError>, S: Into<String>>(error: E, component: S) -> Self {
        Self {
            error: error.into(),
            component: component.into(),
            details: None,
            trace: None,
        }
    }

    /// Adds detail information to the error context.
    ///
    /// # Arguments
    ///
    /// * `details` - Additional context information to help with debugging
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Adds trace information to the error context.
    ///
    /// # Arguments
    ///
    /// * `trace` - Trace as a string
    pub fn with_trace<S: Into<String>>(mut self, trace: S) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Captures the current tracing span trace.
    ///
    /// Empty unless the subscriber has a `tracing_error::ErrorLayer`.
    pub fn with_span_trace(self) -> Self {
        let trace = SpanTrace::capture().to_string();
        if trace.is_empty() {
            self
        } else {
            self.with_trace(trace)
        }
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    ///
    /// # Arguments
    ///
    /// * `context` - The error context to report
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            trace = context.trace.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Routes error contexts to the configured reporter.
#[derive(Debug, Clone, Default)]
pub struct ErrorReporting {
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl ErrorReporting {
    /// Creates an error reporting handle backed by `reporter`.
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            reporter: Some(reporter),
        }
    }

    /// Set the error reporter.
    ///
    /// # Arguments
    ///
    /// * `reporter` - The error reporter to use
    pub fn set_reporter(&mut self, reporter: Arc<dyn ErrorReporter>) {
        self.reporter = Some(reporter);
    }

    /// Report an error with context.
    ///
    /// # Arguments
    ///
    /// * `context` - The error context to report
    pub fn report(&self, context: ErrorContext) {
        if let Some(reporter) = &self.reporter {
            reporter.report(context);
        } else {
            // Fallback to standard error output if no reporter is configured
            eprintln!("Error: {context}");
        }
    }
}
