//! Session-local filter editing state machine.
//!
//! # Responsibility
//! - Hold the committed filter state and the optional pending overlay.
//! - Apply immediate-commit and batched affordances with their transition
//!   rules, returning the URL the router should navigate to.
//!
//! # Invariants
//! - `Idle` has no pending overlay; `Editing` always has one.
//! - Only `apply` moves pending into committed; `discard` and navigation drop
//!   pending without merging.
//! - Country and radius are mutually exclusive; clearing one never restores
//!   the other.
//! - Re-activating the active value of activity, country or radius clears it.
//! - Switching tabs never touches pending state.
//! - Committed state always equals what its own URL decodes to. Chip slugs
//!   that do not resolve in the held taxonomy are never committed.

use crate::codec::resolver::resolve_as;
use crate::codec::url_codec::{
    decode, decode_with_report, encode, DecodeIssue, UrlParts, QUERY_AGE, QUERY_DURATION,
    QUERY_STRENUOUSNESS,
};
use crate::config::RadiusConfig;
use crate::model::filter_state::{DurationBucket, FilterState, ViewMode};
use crate::model::taxonomy::{slugify, Taxonomy, TaxonomyKind};
use log::{debug, info, warn};

const ANY_VALUE: &str = "any";

/// Store lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Idle,
    Editing,
}

/// Filter panel tab; purely presentational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterTab {
    #[default]
    What,
    Where,
    When,
}

/// Outcome of one store event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Committed URL state changed; the router should navigate to `url`.
    Committed { url: UrlParts },
    /// Committed session-local state (radius) changed; the URL did not.
    LocalCommitted,
    /// Pending overlay was opened or changed.
    Staged,
    /// Pending overlay was dropped.
    Discarded,
    /// Nothing changed.
    Unchanged,
}

/// Committed filter state plus an optional pending edit overlay.
#[derive(Debug, Clone)]
pub struct FilterStateStore {
    committed: FilterState,
    pending: Option<FilterState>,
    radius_miles: Option<u32>,
    active_tab: FilterTab,
    radius_options: Vec<u32>,
    taxonomy: Taxonomy,
}

impl FilterStateStore {
    /// Creates an idle store around an already decoded state.
    ///
    /// `taxonomy` is the one the state was decoded with; chip toggles are
    /// resolved against it.
    pub fn new(committed: FilterState, taxonomy: Taxonomy, radius: &RadiusConfig) -> Self {
        Self {
            committed,
            pending: None,
            radius_miles: None,
            active_tab: FilterTab::default(),
            radius_options: radius.options_miles.clone(),
            taxonomy,
        }
    }

    /// Decodes `parts` and creates an idle store for it.
    pub fn from_url(
        parts: &UrlParts,
        taxonomy: &Taxonomy,
        radius: &RadiusConfig,
    ) -> (Self, Vec<DecodeIssue>) {
        let report = decode_with_report(parts, taxonomy);
        (
            Self::new(report.state, taxonomy.clone(), radius),
            report.issues,
        )
    }

    pub fn mode(&self) -> StoreMode {
        if self.pending.is_some() {
            StoreMode::Editing
        } else {
            StoreMode::Idle
        }
    }

    pub fn committed(&self) -> &FilterState {
        &self.committed
    }

    pub fn pending(&self) -> Option<&FilterState> {
        self.pending.as_ref()
    }

    /// What the filter panel shows: pending while editing, else committed.
    pub fn effective(&self) -> &FilterState {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    pub fn radius_miles(&self) -> Option<u32> {
        self.radius_miles
    }

    pub fn active_tab(&self) -> FilterTab {
        self.active_tab
    }

    /// Switches the visible tab. Pending edits are kept.
    pub fn select_tab(&mut self, tab: FilterTab) {
        self.active_tab = tab;
    }

    /// Replaces committed state with the decoded URL and drops pending edits.
    ///
    /// Radius survives navigation unless the new state selects a country.
    pub fn navigate(&mut self, parts: &UrlParts, taxonomy: &Taxonomy) -> Vec<DecodeIssue> {
        let report = decode_with_report(parts, taxonomy);
        if self.pending.take().is_some() {
            info!("event=filter_navigate module=session status=ok pending=discarded");
        }
        self.committed = report.state;
        self.taxonomy = taxonomy.clone();
        if self.committed.country_slug.is_some() {
            self.radius_miles = None;
        }
        debug!(
            "event=filter_navigate module=session status=ok issues={}",
            report.issues.len()
        );
        report.issues
    }

    /// Activity chip click: selects the activity, or clears it when active.
    ///
    /// Unknown slugs are ignored. So is an activity whose slug also names a
    /// country while no country is selected, since `/<slug>` decodes as the
    /// country.
    pub fn toggle_activity(&mut self, slug: &str) -> Transition {
        let slug = slugify(slug);
        if slug.is_empty() {
            return Transition::Unchanged;
        }
        if self.committed.activity_slug.as_deref() == Some(slug.as_str()) {
            return self.commit_immediate(|state| state.activity_slug = None);
        }
        let Some(slug) = self.resolve_chip(&slug, TaxonomyKind::Activity) else {
            return Transition::Unchanged;
        };
        if self.committed.country_slug.is_none()
            && resolve_as(&slug, TaxonomyKind::Country, &self.taxonomy).is_some()
        {
            warn!(
                "event=chip_toggle module=session status=ignored reason=ambiguous_without_country kind=activity slug={slug}"
            );
            return Transition::Unchanged;
        }
        self.commit_immediate(|state| state.activity_slug = Some(slug.clone()))
    }

    /// Country chip click: selects the country (clearing radius), or clears it
    /// when active. Unknown slugs are ignored and leave radius alone.
    pub fn toggle_country(&mut self, slug: &str) -> Transition {
        let slug = slugify(slug);
        if slug.is_empty() {
            return Transition::Unchanged;
        }
        if self.committed.country_slug.as_deref() == Some(slug.as_str()) {
            return self.commit_immediate(|state| state.country_slug = None);
        }
        let Some(slug) = self.resolve_chip(&slug, TaxonomyKind::Country) else {
            return Transition::Unchanged;
        };
        self.radius_miles = None;
        self.commit_immediate(|state| state.country_slug = Some(slug.clone()))
    }

    /// Radius chip click: selects the radius (clearing country), or clears it
    /// when active. Values outside the configured options are ignored.
    pub fn toggle_radius(&mut self, miles: u32) -> Transition {
        if !self.radius_options.contains(&miles) {
            warn!("event=radius_select module=session status=ignored reason=unsupported miles={miles}");
            return Transition::Unchanged;
        }

        if self.radius_miles == Some(miles) {
            self.radius_miles = None;
            return Transition::LocalCommitted;
        }

        self.radius_miles = Some(miles);
        match self.commit_immediate(|state| state.country_slug = None) {
            Transition::Unchanged => Transition::LocalCommitted,
            committed => committed,
        }
    }

    /// Remove badge on the activity chip.
    pub fn clear_activity(&mut self) -> Transition {
        self.commit_immediate(|state| state.activity_slug = None)
    }

    /// Remove badge on the country chip. Radius stays cleared.
    pub fn clear_country(&mut self) -> Transition {
        self.radius_miles = None;
        self.commit_immediate(|state| state.country_slug = None)
    }

    /// Remove badge on the radius chip.
    pub fn clear_radius(&mut self) -> Transition {
        if self.radius_miles.take().is_some() {
            Transition::LocalCommitted
        } else {
            Transition::Unchanged
        }
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> Transition {
        self.commit_immediate(|state| state.view_mode = view_mode)
    }

    pub fn set_expanded(&mut self, expanded: bool) -> Transition {
        self.commit_immediate(|state| state.expanded = expanded)
    }

    /// Opens a batched edit seeded from committed state.
    pub fn begin_edit(&mut self) -> Transition {
        if self.pending.is_some() {
            return Transition::Unchanged;
        }
        self.pending = Some(self.committed.clone());
        debug!("event=filter_edit module=session status=start");
        Transition::Staged
    }

    pub fn set_duration(&mut self, duration: Option<DurationBucket>) -> Transition {
        self.edit_pending(|pending| pending.duration = duration)
    }

    pub fn set_age(&mut self, age: Option<String>) -> Transition {
        self.edit_pending(|pending| pending.age = age)
    }

    pub fn set_strenuousness(&mut self, strenuousness: Option<String>) -> Transition {
        self.edit_pending(|pending| pending.strenuousness = strenuousness)
    }

    /// Stages one facet from the "more filters" panel.
    ///
    /// Keys with dedicated fields are routed to them; an empty value removes
    /// the facet. An unparsable `duration` leaves pending untouched.
    pub fn set_extra_filter(&mut self, key: &str, value: &str) -> Transition {
        let key = key.trim();
        if key.is_empty() {
            return Transition::Unchanged;
        }
        match key {
            QUERY_DURATION => {
                if value.is_empty() || value.eq_ignore_ascii_case(ANY_VALUE) {
                    return self.set_duration(None);
                }
                match DurationBucket::parse(value) {
                    Some(bucket) => self.set_duration(Some(bucket)),
                    None => {
                        warn!("event=filter_edit module=session status=ignored reason=malformed_duration");
                        Transition::Unchanged
                    }
                }
            }
            QUERY_AGE => self.set_age(Some(value.to_string())),
            QUERY_STRENUOUSNESS => self.set_strenuousness(Some(value.to_string())),
            _ => self.edit_pending(|pending| pending.extra_filters.set(key, value)),
        }
    }

    /// Commits pending edits. The pending value is moved out before encoding,
    /// so the URL reflects it exactly as of this call.
    pub fn apply(&mut self) -> Transition {
        let Some(mut pending) = self.pending.take() else {
            return Transition::Unchanged;
        };
        drop_any_values(&mut pending);
        drop_shadowed_activity(&mut pending, &self.taxonomy);
        let url = encode(&pending);
        self.committed = decode(&url, &self.taxonomy);
        info!(
            "event=filter_apply module=session status=ok batched_filters={}",
            self.committed.batched_filter_count()
        );
        Transition::Committed { url }
    }

    /// Drops pending edits; committed state is untouched.
    pub fn discard(&mut self) -> Transition {
        match self.pending.take() {
            Some(_) => {
                debug!("event=filter_edit module=session status=discarded");
                Transition::Discarded
            }
            None => Transition::Unchanged,
        }
    }

    fn resolve_chip(&self, slug: &str, kind: TaxonomyKind) -> Option<String> {
        let resolved = resolve_as(slug, kind, &self.taxonomy).map(|item| item.slug());
        if resolved.is_none() {
            warn!(
                "event=chip_toggle module=session status=ignored reason=unknown_slug kind={} slug={slug}",
                kind.as_str()
            );
        }
        resolved
    }

    fn edit_pending(&mut self, change: impl FnOnce(&mut FilterState)) -> Transition {
        let pending = self
            .pending
            .get_or_insert_with(|| self.committed.clone());
        change(pending);
        Transition::Staged
    }

    // Immediate affordances during Editing also land in pending, so a later
    // apply does not revert them. Committed is re-read from its own URL.
    fn commit_immediate(&mut self, change: impl Fn(&mut FilterState)) -> Transition {
        let mut committed = self.committed.clone();
        change(&mut committed);
        drop_shadowed_activity(&mut committed, &self.taxonomy);
        if let Some(pending) = self.pending.as_mut() {
            change(pending);
            drop_shadowed_activity(pending, &self.taxonomy);
        }
        if committed == self.committed {
            return Transition::Unchanged;
        }
        let url = encode(&committed);
        self.committed = decode(&url, &self.taxonomy);
        Transition::Committed { url }
    }
}

// `/<slug>` decodes as the country when the slug names both kinds, so such an
// activity cannot stand without a country.
fn drop_shadowed_activity(state: &mut FilterState, taxonomy: &Taxonomy) {
    if state.country_slug.is_some() {
        return;
    }
    let Some(activity) = state.activity_slug.as_deref() else {
        return;
    };
    if resolve_as(activity, TaxonomyKind::Country, taxonomy).is_some() {
        debug!("event=chip_toggle module=session status=cleared reason=shadowed_by_country slug={activity}");
        state.activity_slug = None;
    }
}

fn is_blank_or_any(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY_VALUE)
}

fn drop_any_values(state: &mut FilterState) {
    if state.age.as_deref().is_some_and(is_blank_or_any) {
        state.age = None;
    }
    if state
        .strenuousness
        .as_deref()
        .is_some_and(is_blank_or_any)
    {
        state.strenuousness = None;
    }
    state.extra_filters.retain(|_, value| !is_blank_or_any(value));
}

#[cfg(test)]
mod tests {
    use super::{FilterStateStore, StoreMode, Transition};
    use crate::config::RadiusConfig;
    use crate::model::filter_state::FilterState;
    use crate::model::taxonomy::Taxonomy;

    fn empty_store() -> FilterStateStore {
        FilterStateStore::new(
            FilterState::default(),
            Taxonomy::default(),
            &RadiusConfig::default(),
        )
    }

    #[test]
    fn edit_without_begin_opens_editing() {
        let mut store = empty_store();
        assert_eq!(store.mode(), StoreMode::Idle);
        assert_eq!(store.set_age(Some("18+".to_string())), Transition::Staged);
        assert_eq!(store.mode(), StoreMode::Editing);
        assert_eq!(store.committed().age, None);
        assert_eq!(store.effective().age.as_deref(), Some("18+"));
    }

    #[test]
    fn apply_drops_any_values() {
        let mut store = empty_store();
        store.set_extra_filter("season", "Any");
        store.set_extra_filter("difficulty", "Hard");
        store.set_age(Some("any".to_string()));

        let Transition::Committed { url } = store.apply() else {
            panic!("apply should commit");
        };
        assert_eq!(url.to_url_string(), "/?difficulty=Hard");
        assert_eq!(store.committed().age, None);
        assert!(!store.committed().extra_filters.contains_key("season"));
    }

    #[test]
    fn unsupported_radius_is_ignored() {
        let mut store = empty_store();
        assert_eq!(store.toggle_radius(7), Transition::Unchanged);
        assert_eq!(store.radius_miles(), None);
    }

    #[test]
    fn chips_missing_from_the_taxonomy_are_ignored() {
        let mut store = empty_store();
        assert_eq!(store.toggle_radius(50), Transition::LocalCommitted);
        assert_eq!(store.toggle_activity("hiking"), Transition::Unchanged);
        assert_eq!(store.toggle_country("peru"), Transition::Unchanged);
        assert_eq!(store.radius_miles(), Some(50));
        assert_eq!(store.committed(), &FilterState::default());
    }
}
