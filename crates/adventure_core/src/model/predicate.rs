//! Query predicate model.
//!
//! # Responsibility
//! - Define the atomic filter conditions applied to the adventure collection.
//! - Provide in-memory evaluation with the same semantics the SQLite store uses.
//!
//! # Invariants
//! - `Range` bounds are inclusive on both ends; a missing bound is unbounded.
//! - Text comparisons are exact for `Equals` and case-insensitive substring
//!   for `Contains`.

use serde::{Deserialize, Serialize};

/// Adventure activity membership.
pub const FIELD_ACTIVITY: &str = "activity";
/// Adventure country slug.
pub const FIELD_COUNTRY: &str = "country";
/// Adventure duration in hours.
pub const FIELD_DURATION_HOURS: &str = "duration_hours";
/// Recommended age bracket.
pub const FIELD_AGE: &str = "recommended_age";
/// Strenuousness rating.
pub const FIELD_STRENUOUSNESS: &str = "strenuousness";
/// Adventure title (searchable with `Contains`).
pub const FIELD_TITLE: &str = "title";
/// Free-form location text (searchable with `Contains`).
pub const FIELD_LOCATION: &str = "location";

/// One atomic filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    Equals {
        field: String,
        value: String,
    },
    Range {
        field: String,
        min: Option<i64>,
        max: Option<i64>,
    },
    Contains {
        field: String,
        value: String,
    },
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn range(field: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Self {
        Self::Range {
            field: field.into(),
            min,
            max,
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Field this predicate constrains.
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::Range { field, .. } | Self::Contains { field, .. } => {
                field
            }
        }
    }

    /// Whether a numeric value falls inside this predicate's range.
    ///
    /// Returns `false` for non-range predicates.
    pub fn admits(&self, value: f64) -> bool {
        match self {
            Self::Range { min, max, .. } => {
                min.map_or(true, |min| value >= min as f64)
                    && max.map_or(true, |max| value <= max as f64)
            }
            _ => false,
        }
    }

    /// Evaluates this predicate against one record.
    ///
    /// Missing fields never match.
    pub fn matches<T: PredicateTarget + ?Sized>(&self, target: &T) -> bool {
        match self {
            Self::Equals { field, value } => target
                .text_values(field)
                .iter()
                .any(|candidate| candidate == value),
            Self::Range { field, .. } => target
                .numeric_value(field)
                .is_some_and(|number| self.admits(number)),
            Self::Contains { field, value } => {
                let needle = value.to_lowercase();
                target
                    .text_values(field)
                    .iter()
                    .any(|candidate| candidate.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Record shape predicates can be evaluated against.
pub trait PredicateTarget {
    /// All text values for `field` (multi-valued fields return several).
    fn text_values(&self, field: &str) -> Vec<String>;
    /// Numeric value for `field`, when the record has one.
    fn numeric_value(&self, field: &str) -> Option<f64>;
}

/// Ordered predicates plus the "any filter present" flag.
///
/// `has_any_filter == false` means "no filtering requested", which callers
/// must distinguish from "filters present but nothing matched".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSet {
    pub predicates: Vec<Predicate>,
    pub has_any_filter: bool,
}

impl PredicateSet {
    pub fn from_predicates(predicates: Vec<Predicate>) -> Self {
        let has_any_filter = !predicates.is_empty();
        Self {
            predicates,
            has_any_filter,
        }
    }

    /// Conjunction of every predicate; an empty set matches everything.
    pub fn matches<T: PredicateTarget + ?Sized>(&self, target: &T) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(target))
    }
}

/// What an unfiltered query (`has_any_filter == false`) returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfilteredPolicy {
    /// Browse mode: every adventure.
    #[default]
    ReturnAll,
    /// Search mode: nothing until a filter is chosen.
    ReturnNone,
}
