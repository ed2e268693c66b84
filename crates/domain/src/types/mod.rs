//! Common data types used throughout the application

pub mod outcome;
pub mod portal;
pub mod post;

pub use outcome::{ForwardOutcome, ForwardReport, SkipReason};
pub use portal::Portal;
pub use post::{PostContent, PostSnapshot, SaveContext, TaxonomyTerms, TermRef};
