//! Adventure domain model.
//!
//! # Responsibility
//! - Define the catalog record that predicates filter.
//! - Validate record invariants before persistence.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - Activity and country references are canonical slugs.
//! - `duration_hours`, when set, is finite and non-negative.

use crate::model::predicate::{
    PredicateTarget, FIELD_ACTIVITY, FIELD_AGE, FIELD_COUNTRY, FIELD_DURATION_HOURS,
    FIELD_LOCATION, FIELD_STRENUOUSNESS, FIELD_TITLE,
};
use crate::model::taxonomy::slugify;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for adventures.
pub type AdventureId = Uuid;

/// Catalog record: one bookable adventure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adventure {
    pub id: AdventureId,
    pub title: String,
    /// Free-form location text, e.g. `Cortina d'Ampezzo, Italy`.
    pub location: String,
    pub country_slug: Option<String>,
    #[serde(default)]
    pub activity_slugs: Vec<String>,
    pub duration_hours: Option<f64>,
    pub recommended_age: Option<String>,
    pub strenuousness: Option<String>,
    pub image_url: Option<String>,
    pub created_by: Option<String>,
    /// Opaque facets matched by pass-through query filters.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Adventure {
    /// Creates an adventure with a generated ID and no facets.
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            location: location.into(),
            country_slug: None,
            activity_slugs: Vec::new(),
            duration_hours: None,
            recommended_age: None,
            strenuousness: None,
            image_url: None,
            created_by: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Validates record invariants.
    pub fn validate(&self) -> Result<(), AdventureValidationError> {
        if self.id.is_nil() {
            return Err(AdventureValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(AdventureValidationError::EmptyTitle);
        }
        if let Some(hours) = self.duration_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(AdventureValidationError::InvalidDuration(hours));
            }
        }
        if let Some(slug) = &self.country_slug {
            ensure_canonical_slug(slug)?;
        }
        for slug in &self.activity_slugs {
            ensure_canonical_slug(slug)?;
        }
        if self.attributes.keys().any(|key| key.trim().is_empty()) {
            return Err(AdventureValidationError::EmptyAttributeKey);
        }
        Ok(())
    }
}

fn ensure_canonical_slug(slug: &str) -> Result<(), AdventureValidationError> {
    if slug.is_empty() || slugify(slug) != slug {
        return Err(AdventureValidationError::NonCanonicalSlug(slug.to_string()));
    }
    Ok(())
}

impl PredicateTarget for Adventure {
    fn text_values(&self, field: &str) -> Vec<String> {
        match field {
            FIELD_ACTIVITY => self.activity_slugs.clone(),
            FIELD_COUNTRY => self.country_slug.iter().cloned().collect(),
            FIELD_AGE => self.recommended_age.iter().cloned().collect(),
            FIELD_STRENUOUSNESS => self.strenuousness.iter().cloned().collect(),
            FIELD_TITLE => vec![self.title.clone()],
            FIELD_LOCATION => vec![self.location.clone()],
            other => self.attributes.get(other).cloned().into_iter().collect(),
        }
    }

    fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            FIELD_DURATION_HOURS => self.duration_hours,
            _ => None,
        }
    }
}

/// Adventure invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum AdventureValidationError {
    NilId,
    EmptyTitle,
    InvalidDuration(f64),
    NonCanonicalSlug(String),
    EmptyAttributeKey,
}

impl Display for AdventureValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "adventure id must not be nil"),
            Self::EmptyTitle => write!(f, "adventure title must not be blank"),
            Self::InvalidDuration(hours) => {
                write!(f, "duration_hours must be finite and >= 0, got {hours}")
            }
            Self::NonCanonicalSlug(slug) => write!(f, "slug is not canonical: `{slug}`"),
            Self::EmptyAttributeKey => write!(f, "attribute keys must not be blank"),
        }
    }
}

impl Error for AdventureValidationError {}
