//! Taxonomy domain model (activities and countries).
//!
//! # Responsibility
//! - Define the reference items a catalog URL can point at.
//! - Own the canonical slug derivation shared by decode, encode and storage.
//!
//! # Invariants
//! - `slug` is lowercase with whitespace runs collapsed to a single hyphen.
//! - Slugs are unique within one kind; the same slug may exist in both kinds.
//! - An empty taxonomy is a valid value (every lookup misses).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier for taxonomy items.
pub type TaxonomyItemId = Uuid;

/// Which reference collection an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Activity,
    Country,
}

impl TaxonomyKind {
    /// Stable lowercase label used in logs and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Country => "country",
        }
    }
}

/// One activity or country entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyItem {
    pub id: TaxonomyItemId,
    /// Display name, e.g. `Rock Climbing`.
    pub name: String,
    /// Optional display emoji rendered before the name.
    pub emoji: Option<String>,
    pub kind: TaxonomyKind,
}

impl TaxonomyItem {
    /// Creates an item with a generated stable ID.
    pub fn new(kind: TaxonomyKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            emoji: None,
            kind,
        }
    }

    /// Builder-style emoji setter.
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Canonical URL slug derived from `name`.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Chip label: `"{emoji} {name}"` when an emoji is present.
    pub fn label(&self) -> String {
        match self.emoji.as_deref().map(str::trim) {
            Some(emoji) if !emoji.is_empty() => format!("{emoji} {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Derives a URL slug from a display name.
///
/// Leading/trailing whitespace is dropped, the rest is lowercased and every
/// whitespace run becomes one hyphen. Applying it twice is a no-op.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    WHITESPACE_RUN_RE.replace_all(&lowered, "-").into_owned()
}

/// Both reference collections, loaded in full.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    pub activities: Vec<TaxonomyItem>,
    #[serde(default)]
    pub countries: Vec<TaxonomyItem>,
}

impl Taxonomy {
    pub fn new(activities: Vec<TaxonomyItem>, countries: Vec<TaxonomyItem>) -> Self {
        Self {
            activities,
            countries,
        }
    }

    /// Returns `true` when neither collection has any entry.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty() && self.countries.is_empty()
    }

    /// Items of one kind in load order.
    pub fn items(&self, kind: TaxonomyKind) -> &[TaxonomyItem] {
        match kind {
            TaxonomyKind::Activity => &self.activities,
            TaxonomyKind::Country => &self.countries,
        }
    }

    /// Exact slug lookup within one kind.
    ///
    /// `slug` is normalized with [`slugify`] before comparison, so the lookup
    /// is case-insensitive and whitespace-normalized. Linear in kind size.
    pub fn find(&self, kind: TaxonomyKind, slug: &str) -> Option<&TaxonomyItem> {
        let wanted = slugify(slug);
        if wanted.is_empty() {
            return None;
        }
        self.items(kind).iter().find(|item| item.slug() == wanted)
    }
}
