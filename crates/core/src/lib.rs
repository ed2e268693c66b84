//! # Crosspost Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The forward engine (guard, snapshot builder, payload strategies,
//!   forward service)
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `crosspost-domain`
//! - No HTTP or storage code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod forward;

// Re-export specific items to avoid ambiguity
pub use forward::guard::{AttemptGuard, GuardTtls, LockState};
pub use forward::ports::{
    ContentRepository, FlagStore, OptionsProvider, PublishReceipt, RemotePublisher,
};
pub use forward::service::ForwardService;
pub use forward::snapshot::SnapshotBuilder;
