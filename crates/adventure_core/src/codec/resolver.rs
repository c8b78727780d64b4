//! Path-segment resolution against the activity and country taxonomies.
//!
//! # Responsibility
//! - Map one raw URL segment to an explicit `Resolution` variant.
//! - Expose both per-kind candidates so callers can detect ambiguity.
//!
//! # Invariants
//! - Matching is exact on the normalized slug; no partial or fuzzy matches.
//! - A segment matching a country always resolves to the country, even when
//!   an activity shares the slug.

use crate::model::taxonomy::{Taxonomy, TaxonomyItem, TaxonomyKind};

/// Outcome of resolving one path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Activity(&'a TaxonomyItem),
    Country(&'a TaxonomyItem),
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn item(&self) -> Option<&'a TaxonomyItem> {
        match self {
            Self::Activity(item) | Self::Country(item) => Some(item),
            Self::Unresolved => None,
        }
    }

    pub fn kind(&self) -> Option<TaxonomyKind> {
        match self {
            Self::Activity(_) => Some(TaxonomyKind::Activity),
            Self::Country(_) => Some(TaxonomyKind::Country),
            Self::Unresolved => None,
        }
    }
}

/// Per-kind matches for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMatches<'a> {
    pub activity: Option<&'a TaxonomyItem>,
    pub country: Option<&'a TaxonomyItem>,
}

impl<'a> SegmentMatches<'a> {
    /// Both kinds carry the slug.
    pub fn is_ambiguous(&self) -> bool {
        self.activity.is_some() && self.country.is_some()
    }

    /// Collapses the matches with country priority.
    pub fn resolution(&self) -> Resolution<'a> {
        match (self.country, self.activity) {
            (Some(country), _) => Resolution::Country(country),
            (None, Some(activity)) => Resolution::Activity(activity),
            (None, None) => Resolution::Unresolved,
        }
    }
}

/// Looks the segment up in both kinds.
pub fn match_segment<'a>(segment: &str, taxonomy: &'a Taxonomy) -> SegmentMatches<'a> {
    SegmentMatches {
        activity: taxonomy.find(TaxonomyKind::Activity, segment),
        country: taxonomy.find(TaxonomyKind::Country, segment),
    }
}

/// Resolves a segment to an activity, a country, or nothing.
pub fn resolve_segment<'a>(segment: &str, taxonomy: &'a Taxonomy) -> Resolution<'a> {
    match_segment(segment, taxonomy).resolution()
}

/// Resolves a segment against one kind only (positional path slots).
pub fn resolve_as<'a>(
    segment: &str,
    kind: TaxonomyKind,
    taxonomy: &'a Taxonomy,
) -> Option<&'a TaxonomyItem> {
    taxonomy.find(kind, segment)
}

#[cfg(test)]
mod tests {
    use super::{match_segment, resolve_segment, Resolution};
    use crate::model::taxonomy::{Taxonomy, TaxonomyItem, TaxonomyKind};

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(
            vec![
                TaxonomyItem::new(TaxonomyKind::Activity, "Hiking"),
                TaxonomyItem::new(TaxonomyKind::Activity, "Georgia"),
            ],
            vec![
                TaxonomyItem::new(TaxonomyKind::Country, "Italy"),
                TaxonomyItem::new(TaxonomyKind::Country, "Georgia"),
            ],
        )
    }

    #[test]
    fn shared_slug_prefers_country() {
        let taxonomy = taxonomy();
        let matches = match_segment("georgia", &taxonomy);
        assert!(matches.is_ambiguous());
        assert!(matches!(
            resolve_segment("georgia", &taxonomy),
            Resolution::Country(item) if item.name == "Georgia"
        ));
    }

    #[test]
    fn partial_slugs_do_not_match() {
        let taxonomy = taxonomy();
        assert_eq!(resolve_segment("hik", &taxonomy), Resolution::Unresolved);
        assert_eq!(resolve_segment("", &taxonomy), Resolution::Unresolved);
    }
}
