//! Predicate construction for the adventure collection.
//!
//! # See also
//! - `repo::adventure_repo` for the SQLite translation of predicates.

pub mod predicate_builder;
