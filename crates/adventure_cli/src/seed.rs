//! JSON catalog fixture import.
//!
//! Fixtures reference taxonomy by display name; slugs are derived on import.

use adventure_core::{
    slugify, Adventure, AdventureRepository, TaxonomyItem, TaxonomyKind, TaxonomyRepository,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub activities: Vec<FixtureItem>,
    #[serde(default)]
    pub countries: Vec<FixtureItem>,
    #[serde(default)]
    pub adventures: Vec<FixtureAdventure>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureItem {
    pub name: String,
    pub emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureAdventure {
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub location: String,
    /// Country display name or slug.
    pub country: Option<String>,
    /// Activity display names or slugs.
    #[serde(default)]
    pub activities: Vec<String>,
    pub duration_hours: Option<f64>,
    pub recommended_age: Option<String>,
    pub strenuousness: Option<String>,
    pub image_url: Option<String>,
    pub created_by: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SeedSummary {
    pub activities: usize,
    pub countries: usize,
    pub adventures: usize,
}

impl FixtureAdventure {
    fn into_adventure(self) -> Adventure {
        let mut adventure = Adventure::new(self.title, self.location);
        if let Some(id) = self.id {
            adventure.id = id;
        }
        adventure.country_slug = self
            .country
            .map(|country| slugify(&country))
            .filter(|slug| !slug.is_empty());
        adventure.activity_slugs = self
            .activities
            .iter()
            .map(String::as_str)
            .map(slugify)
            .filter(|slug| !slug.is_empty())
            .collect();
        adventure.duration_hours = self.duration_hours;
        adventure.recommended_age = self.recommended_age;
        adventure.strenuousness = self.strenuousness;
        adventure.image_url = self.image_url;
        adventure.created_by = self.created_by;
        adventure.attributes = self.attributes;
        adventure
    }
}

/// Writes every fixture entry, stopping at the first failure.
pub fn import(
    taxonomy_repo: &impl TaxonomyRepository,
    adventure_repo: &impl AdventureRepository,
    fixture: CatalogFixture,
) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for (kind, items) in [
        (TaxonomyKind::Activity, fixture.activities),
        (TaxonomyKind::Country, fixture.countries),
    ] {
        for entry in items {
            let mut item = TaxonomyItem::new(kind, entry.name);
            item.emoji = entry.emoji;
            taxonomy_repo
                .create_item(&item)
                .with_context(|| format!("failed to import {} `{}`", kind.as_str(), item.name))?;
            match kind {
                TaxonomyKind::Activity => summary.activities += 1,
                TaxonomyKind::Country => summary.countries += 1,
            }
        }
    }

    for entry in fixture.adventures {
        let adventure = entry.into_adventure();
        adventure_repo
            .create_adventure(&adventure)
            .with_context(|| format!("failed to import adventure `{}`", adventure.title))?;
        summary.adventures += 1;
    }

    Ok(summary)
}
