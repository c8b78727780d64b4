//! Adventure catalog filter core.
//!
//! Reconciles the three URL representations of a catalog filter (path
//! segments, query pairs, hash tokens) into one canonical `FilterState`,
//! turns it into query predicates, and runs them against the SQLite catalog.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod search;
pub mod service;
pub mod session;

pub use codec::resolver::{resolve_segment, Resolution};
pub use codec::url_codec::{
    decode, decode_url, decode_with_report, encode, DecodeIssue, DecodeReport, HashToken,
    UrlParts,
};
pub use config::{load_config, AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{
    default_log_level, init_from_config, init_logging, init_stderr_logging, logging_status,
    LoggingError,
};
pub use model::adventure::{Adventure, AdventureId, AdventureValidationError};
pub use model::filter_state::{DurationBucket, ExtraFilters, FilterState, ViewMode};
pub use model::predicate::{Predicate, PredicateSet, UnfilteredPolicy};
pub use model::taxonomy::{slugify, Taxonomy, TaxonomyItem, TaxonomyKind};
pub use query::predicate_builder::build as build_predicates;
pub use repo::adventure_repo::{AdventureRepository, SqliteAdventureRepository};
pub use repo::taxonomy_repo::{SqliteTaxonomyRepository, TaxonomyRepository};
pub use repo::{RepoError, RepoResult};
pub use search::chips::{build_chips, Chip, ChipList};
pub use service::catalog_service::{CatalogError, CatalogService, CatalogView};
pub use session::filter_store::{FilterStateStore, FilterTab, StoreMode, Transition};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
