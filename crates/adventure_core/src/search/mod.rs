//! Chip discovery over the loaded taxonomy.
//!
//! # Responsibility
//! - Turn taxonomy items into searchable, selectable chips.
//! - Keep chip ordering rules inside core so every caller renders the same list.

pub mod chips;
