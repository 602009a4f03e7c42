// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Cross-module tests for CodeDNA.
//!
//! Component unit tests live next to their code; this module holds the
//! tests that span modules and the shared fixtures:
//! - configuration loading and validation
//! - error aggregation and reporting
//! - fingerprint-to-tree properties using proptest

pub mod config_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{
    commit_hash_strategy, create_test_dir, hash_starting_with, history_strategy, listing,
    TestFixture,
};
