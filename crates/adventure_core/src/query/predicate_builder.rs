//! Filter state -> predicate compilation.
//!
//! # Responsibility
//! - Compile canonical `FilterState` into an ordered predicate sequence.
//! - Report whether any filtering was requested at all.
//!
//! # Invariants
//! - Emission order is fixed: activity, country, duration, age,
//!   strenuousness, then extra filters in insertion order.
//! - Duration buckets share boundary hours (3 and 6).
//! - View mode and `expanded` never produce predicates.

use crate::model::filter_state::FilterState;
use crate::model::predicate::{
    Predicate, PredicateSet, FIELD_ACTIVITY, FIELD_AGE, FIELD_COUNTRY, FIELD_DURATION_HOURS,
    FIELD_STRENUOUSNESS,
};
use log::debug;

/// Builds the predicate set for one canonical state.
pub fn build(state: &FilterState) -> PredicateSet {
    let mut predicates = Vec::new();

    if let Some(activity) = non_empty(state.activity_slug.as_deref()) {
        predicates.push(Predicate::equals(FIELD_ACTIVITY, activity));
    }
    if let Some(country) = non_empty(state.country_slug.as_deref()) {
        predicates.push(Predicate::equals(FIELD_COUNTRY, country));
    }
    if let Some(bucket) = state.duration {
        let (min, max) = bucket.hour_bounds();
        predicates.push(Predicate::range(FIELD_DURATION_HOURS, min, max));
    }
    if let Some(age) = non_empty(state.age.as_deref()) {
        predicates.push(Predicate::equals(FIELD_AGE, age));
    }
    if let Some(strenuousness) = non_empty(state.strenuousness.as_deref()) {
        predicates.push(Predicate::equals(FIELD_STRENUOUSNESS, strenuousness));
    }
    for (key, value) in state.extra_filters.iter() {
        if value.is_empty() {
            continue;
        }
        predicates.push(Predicate::equals(key, value));
    }

    let set = PredicateSet::from_predicates(predicates);
    debug!(
        "event=predicate_build module=query status=ok predicates={} has_any_filter={}",
        set.predicates.len(),
        set.has_any_filter
    );
    set
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
