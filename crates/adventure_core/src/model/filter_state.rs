//! Canonical filter state.
//!
//! # Responsibility
//! - Define the single authoritative filter representation decoded from URLs.
//! - Keep the facet vocabulary (duration buckets, view modes) in one place.
//!
//! # Invariants
//! - At most one activity slug and one country slug are active.
//! - Stored slugs are canonical taxonomy slugs, never raw URL segments.
//! - `extra_filters` keeps insertion order and never holds empty values.

use serde::{Deserialize, Serialize};

/// Coarse duration grouping exposed through the `duration` query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Parses an exact query-string value; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    /// Inclusive `(min, max)` hour bounds.
    ///
    /// Adjoining buckets share their boundary hour: 3 is both short and
    /// medium, 6 is both medium and long.
    pub fn hour_bounds(self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::Short => (None, Some(3)),
            Self::Medium => (Some(3), Some(6)),
            Self::Long => (Some(6), None),
        }
    }
}

/// How results are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Map,
}

/// Opaque facet filters in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraFilters(Vec<(String, String)>);

impl ExtraFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key`, keeping its original position when it already exists.
    ///
    /// An empty `value` removes the key instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.remove(&key);
            return;
        }
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Inserts only when `key` is not present yet. Returns whether it was added.
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if value.is_empty() || self.contains_key(&key) {
            return false;
        }
        self.0.push((key, value));
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(existing, _)| existing == key)?;
        Some(self.0.remove(index).1)
    }

    /// Keeps only entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.0.retain(|(key, value)| keep(key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::new();
        for (key, value) in iter {
            filters.insert_first(key, value);
        }
        filters
    }
}

/// Canonical filter state, re-derived from the URL on every navigation.
///
/// The same shape doubles as the pending overlay while a batched edit is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub activity_slug: Option<String>,
    pub country_slug: Option<String>,
    pub duration: Option<DurationBucket>,
    pub age: Option<String>,
    pub strenuousness: Option<String>,
    #[serde(default)]
    pub extra_filters: ExtraFilters,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub expanded: bool,
}

impl FilterState {
    /// Returns `true` when any facet that narrows results is set.
    ///
    /// View mode and `expanded` are presentation flags and do not count.
    pub fn has_facets(&self) -> bool {
        self.activity_slug.is_some()
            || self.country_slug.is_some()
            || self.duration.is_some()
            || self.age.is_some()
            || self.strenuousness.is_some()
            || !self.extra_filters.is_empty()
    }

    /// Number of batched facets set (duration, age, strenuousness, extras).
    ///
    /// Mirrors the badge count shown on the "Filters" button.
    pub fn batched_filter_count(&self) -> usize {
        usize::from(self.duration.is_some())
            + usize::from(self.age.is_some())
            + usize::from(self.strenuousness.is_some())
            + self.extra_filters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{DurationBucket, ExtraFilters, FilterState};

    #[test]
    fn duration_parse_is_exact() {
        assert_eq!(DurationBucket::parse("short"), Some(DurationBucket::Short));
        assert_eq!(DurationBucket::parse("Short"), None);
        assert_eq!(DurationBucket::parse("forever"), None);
    }

    #[test]
    fn extra_filters_keep_position_on_update() {
        let mut filters = ExtraFilters::new();
        filters.set("season", "summer");
        filters.set("difficulty", "easy");
        filters.set("season", "winter");

        let keys: Vec<&str> = filters.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["season", "difficulty"]);
        assert_eq!(filters.get("season"), Some("winter"));

        filters.set("season", "");
        assert!(!filters.contains_key("season"));
    }

    #[test]
    fn insert_first_keeps_first_value() {
        let filters: ExtraFilters = [("pet", "yes"), ("pet", "no"), ("lang", "")]
            .into_iter()
            .collect();
        assert_eq!(filters.get("pet"), Some("yes"));
        assert!(!filters.contains_key("lang"));
    }

    #[test]
    fn presentation_flags_are_not_facets() {
        let mut state = FilterState::default();
        state.expanded = true;
        assert!(!state.has_facets());
        state.age = Some("18+".to_string());
        assert!(state.has_facets());
        assert_eq!(state.batched_filter_count(), 1);
    }
}
