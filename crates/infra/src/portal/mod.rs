//! WordPress REST portal integration
//!
//! Implements the outbound wire protocol: JSON over HTTPS with Basic
//! authentication against `wp-json/wp/v2` routes.

pub mod client;
pub mod media;

pub use client::WpPortalClient;
