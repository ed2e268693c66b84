//! Expiring flag stores backing the re-entrancy guard

pub mod memory;

pub use memory::InMemoryFlagStore;
