//! # Crosspost Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client wrapper
//! - The WordPress REST portal publisher (content create + featured
//!   media sub-protocol)
//! - The in-memory expiring flag store backing the re-entrancy guard
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `crosspost-core`
//! - Depends on `crosspost-domain` and `crosspost-core`
//! - Contains all "impure" code (network I/O, clocks, environment)

pub mod config;
pub mod errors;
pub mod flags;
pub mod http;
pub mod portal;

// Re-export commonly used items
pub use config::StaticOptionsProvider;
pub use flags::InMemoryFlagStore;
pub use http::HttpClient;
pub use portal::WpPortalClient;
