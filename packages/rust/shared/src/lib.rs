//! Shared types, error model, and configuration for kbdocs.
//!
//! This crate is the foundation depended on by all other kbdocs crates.
//! It provides:
//! - [`KbDocsError`]: the unified error type
//! - Domain types ([`Language`], [`FailurePolicy`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, BuildSection, DEFAULT_EXPECTED_ROOT_NAME, DEFAULT_FETCH_COMMAND,
    DEFAULT_PAGES_PER_FILE, config_dir, config_file_path, init_config, load_config,
    load_config_from, resolve_root,
};
pub use error::{KbDocsError, Result};
pub use types::{FailurePolicy, Language};
