//! Configuration loading and management
//!
//! This module provides utilities for loading the forwarding settings
//! from environment variables and files, plus the [`OptionsProvider`]
//! implementation the forward service consumes.
//!
//! [`OptionsProvider`]: crosspost_core::OptionsProvider

pub mod loader;
pub mod provider;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
pub use provider::StaticOptionsProvider;
