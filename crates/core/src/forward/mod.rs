//! The forward engine
//!
//! One forward attempt runs synchronously inside the triggering save
//! event: the guard gates entry, the snapshot builder resolves the
//! content item once, and the service publishes to each selected portal
//! in order before recording the outcome.

pub mod guard;
pub mod payload;
pub mod ports;
pub mod service;
pub mod snapshot;
