//! Repository layer over the SQLite catalog.
//!
//! # Responsibility
//! - Define data access contracts for taxonomy and adventures.
//! - Keep SQL details away from codec/session logic.
//!
//! # Invariants
//! - Writes validate records before any SQL mutation.
//! - Reads reject invalid persisted rows instead of masking them.
//! - Filter values only ever reach SQL as bound parameters.

use crate::db::DbError;
use crate::model::adventure::{AdventureId, AdventureValidationError};
use crate::model::taxonomy::TaxonomyKind;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod adventure_repo;
pub mod taxonomy_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AdventureValidationError),
    InvalidTaxonomyItem(String),
    DuplicateSlug { kind: TaxonomyKind, slug: String },
    Db(DbError),
    NotFound(AdventureId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTaxonomyItem(message) => write!(f, "invalid taxonomy item: {message}"),
            Self::DuplicateSlug { kind, slug } => {
                write!(f, "{} slug already exists: `{slug}`", kind.as_str())
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "adventure not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidTaxonomyItem(_)
            | Self::DuplicateSlug { .. }
            | Self::NotFound(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<AdventureValidationError> for RepoError {
    fn from(value: AdventureValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
