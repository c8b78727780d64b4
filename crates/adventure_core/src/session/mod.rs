//! Per-session filter editing state.
//!
//! One `FilterStateStore` is owned by the active session and mutated by its
//! single writer; there is no shared or global filter state.

pub mod filter_store;
