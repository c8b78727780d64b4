//! Unified taxonomy chip list.
//!
//! # Responsibility
//! - Merge countries and activities into one chip list for the "what/where"
//!   panel.
//! - Apply the chip search term, selection ordering and visibility cap.
//!
//! # Invariants
//! - Countries precede activities; within a kind, taxonomy load order holds.
//! - A `(kind, name)` pair appears at most once.
//! - Selected chips come first without reordering either group.
//! - `visible.len() <= visible_limit` unless the list is expanded.

use crate::model::filter_state::FilterState;
use crate::model::taxonomy::{Taxonomy, TaxonomyItem, TaxonomyKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One selectable taxonomy chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub kind: TaxonomyKind,
    pub slug: String,
    pub label: String,
    pub selected: bool,
}

impl Chip {
    fn from_item(item: &TaxonomyItem, state: &FilterState) -> Self {
        let slug = item.slug();
        let selected = match item.kind {
            TaxonomyKind::Activity => state.activity_slug.as_deref() == Some(slug.as_str()),
            TaxonomyKind::Country => state.country_slug.as_deref() == Some(slug.as_str()),
        };
        Self {
            kind: item.kind,
            slug,
            label: item.label(),
            selected,
        }
    }
}

/// Chip list ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipList {
    pub visible: Vec<Chip>,
    /// Chips left out by the visibility cap ("show more" count).
    pub hidden_count: usize,
}

/// Builds the chip list for `state`.
///
/// `search` is matched case-insensitively against item names; blank means
/// no filtering. The cap is skipped when `state.expanded` is set.
pub fn build_chips(
    taxonomy: &Taxonomy,
    state: &FilterState,
    search: &str,
    visible_limit: usize,
) -> ChipList {
    let needle = search.trim().to_lowercase();
    let mut seen: HashSet<(TaxonomyKind, &str)> = HashSet::new();

    let mut chips: Vec<Chip> = taxonomy
        .countries
        .iter()
        .chain(taxonomy.activities.iter())
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .filter(|item| seen.insert((item.kind, item.name.as_str())))
        .map(|item| Chip::from_item(item, state))
        .collect();

    // Stable: keeps kind and load order inside both groups.
    chips.sort_by_key(|chip| !chip.selected);

    if state.expanded || chips.len() <= visible_limit {
        return ChipList {
            visible: chips,
            hidden_count: 0,
        };
    }

    let hidden_count = chips.len() - visible_limit;
    chips.truncate(visible_limit);
    ChipList {
        visible: chips,
        hidden_count,
    }
}
