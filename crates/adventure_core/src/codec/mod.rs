//! URL codec and taxonomy resolution.
//!
//! # Responsibility
//! - Turn the path/query/hash of a catalog URL into canonical filter state.
//! - Turn filter state back into a URL for the router.
//!
//! # Invariants
//! - Nothing in this module performs I/O or returns an error.

pub mod resolver;
pub mod url_codec;
