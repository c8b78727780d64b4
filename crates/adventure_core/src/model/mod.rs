//! Domain model for the adventure catalog and its filter vocabulary.
//!
//! # Responsibility
//! - Define taxonomy, adventure, filter-state and predicate shapes.
//! - Keep slug derivation in exactly one place.
//!
//! # Invariants
//! - Every slug stored in a model value is produced by `slugify`.

pub mod adventure;
pub mod filter_state;
pub mod predicate;
pub mod taxonomy;
