//! Catalog browse use case.
//!
//! # Responsibility
//! - Run one URL through decode, predicate building and the adventure query.
//! - Open filter editing sessions for a URL.
//!
//! # Invariants
//! - Taxonomy load failures degrade to an empty taxonomy; they never fail a
//!   browse.
//! - Adventure query failures are reported to the caller, never swallowed
//!   into an empty result.

use crate::codec::url_codec::{decode_with_report, encode, DecodeIssue, UrlParts};
use crate::config::AppConfig;
use crate::model::adventure::Adventure;
use crate::model::filter_state::FilterState;
use crate::model::predicate::PredicateSet;
use crate::model::taxonomy::Taxonomy;
use crate::query::predicate_builder;
use crate::repo::adventure_repo::AdventureRepository;
use crate::repo::taxonomy_repo::TaxonomyRepository;
use crate::repo::RepoError;
use crate::search::chips::{build_chips, ChipList};
use crate::session::filter_store::FilterStateStore;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Everything a results page needs for one URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub state: FilterState,
    /// Canonical form of the decoded state.
    pub canonical_url: String,
    pub predicates: PredicateSet,
    pub adventures: Vec<Adventure>,
    pub chips: ChipList,
    pub issues: Vec<DecodeIssue>,
}

#[derive(Debug)]
pub enum CatalogError {
    Query(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(err) => write!(f, "adventure query failed: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Query(value)
    }
}

/// Use-case service over taxonomy and adventure repositories.
pub struct CatalogService<T: TaxonomyRepository, A: AdventureRepository> {
    taxonomy_repo: T,
    adventure_repo: A,
    config: AppConfig,
}

impl<T: TaxonomyRepository, A: AdventureRepository> CatalogService<T, A> {
    pub fn new(taxonomy_repo: T, adventure_repo: A, config: AppConfig) -> Self {
        Self {
            taxonomy_repo,
            adventure_repo,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Loads the taxonomy, falling back to an empty one on failure.
    pub fn load_taxonomy(&self) -> Taxonomy {
        match self.taxonomy_repo.load_taxonomy() {
            Ok(taxonomy) => taxonomy,
            Err(err) => {
                warn!(
                    "event=taxonomy_load module=service status=degraded error_code=taxonomy_unavailable error={err}"
                );
                Taxonomy::default()
            }
        }
    }

    /// Resolves `raw_url` into filter state, predicates, results and chips.
    pub fn browse(&self, raw_url: &str) -> Result<CatalogView, CatalogError> {
        self.browse_with_chip_search(raw_url, "")
    }

    /// Like [`browse`](Self::browse), with a chip search term applied.
    pub fn browse_with_chip_search(
        &self,
        raw_url: &str,
        chip_search: &str,
    ) -> Result<CatalogView, CatalogError> {
        let taxonomy = self.load_taxonomy();
        let report = decode_with_report(&UrlParts::parse(raw_url), &taxonomy);
        let predicates = predicate_builder::build(&report.state);
        let adventures = self
            .adventure_repo
            .list_adventures(&predicates, self.config.catalog.unfiltered)?;
        let chips = build_chips(
            &taxonomy,
            &report.state,
            chip_search,
            self.config.chips.visible_limit,
        );

        info!(
            "event=catalog_browse module=service status=ok predicates={} results={} issues={}",
            predicates.predicates.len(),
            adventures.len(),
            report.issues.len()
        );
        Ok(CatalogView {
            canonical_url: encode(&report.state).to_url_string(),
            state: report.state,
            predicates,
            adventures,
            chips,
            issues: report.issues,
        })
    }

    /// Opens an idle filter editing session for `raw_url`.
    pub fn session(&self, raw_url: &str) -> (FilterStateStore, Vec<DecodeIssue>) {
        let taxonomy = self.load_taxonomy();
        FilterStateStore::from_url(&UrlParts::parse(raw_url), &taxonomy, &self.config.radius)
    }
}
