use adventure_core::{
    build_predicates, Adventure, DurationBucket, FilterState, Predicate, PredicateSet, ViewMode,
};

fn duration_predicate(bucket: DurationBucket) -> Predicate {
    let state = FilterState {
        duration: Some(bucket),
        ..FilterState::default()
    };
    build_predicates(&state).predicates.remove(0)
}

#[test]
fn emission_order_is_fixed() {
    let mut state = FilterState {
        activity_slug: Some("hiking".to_string()),
        country_slug: Some("peru".to_string()),
        duration: Some(DurationBucket::Medium),
        age: Some("12+".to_string()),
        strenuousness: Some("moderate".to_string()),
        view_mode: ViewMode::Map,
        expanded: true,
        ..FilterState::default()
    };
    state.extra_filters.set("season", "summer");
    state.extra_filters.set("guide", "included");

    let set = build_predicates(&state);
    assert_eq!(
        set.predicates,
        vec![
            Predicate::equals("activity", "hiking"),
            Predicate::equals("country", "peru"),
            Predicate::range("duration_hours", Some(3), Some(6)),
            Predicate::equals("recommended_age", "12+"),
            Predicate::equals("strenuousness", "moderate"),
            Predicate::equals("season", "summer"),
            Predicate::equals("guide", "included"),
        ]
    );
    assert!(set.has_any_filter);
}

#[test]
fn bucket_boundaries_overlap_at_three_and_six() {
    let short = duration_predicate(DurationBucket::Short);
    let medium = duration_predicate(DurationBucket::Medium);
    let long = duration_predicate(DurationBucket::Long);

    assert!(short.admits(3.0) && medium.admits(3.0));
    assert!(medium.admits(6.0) && long.admits(6.0));
    assert!(short.admits(0.0));
    assert!(!short.admits(3.5));
    assert!(!long.admits(5.99));
    assert!(long.admits(240.0));
}

#[test]
fn no_filters_is_distinct_from_no_matches() {
    let unfiltered = build_predicates(&FilterState::default());
    assert!(!unfiltered.has_any_filter);
    assert!(unfiltered.predicates.is_empty());

    let filtered = build_predicates(&FilterState {
        country_slug: Some("atlantis".to_string()),
        ..FilterState::default()
    });
    assert!(filtered.has_any_filter);
    let catalog = vec![Adventure::new("Kayak", "Lake Bled")];
    assert!(catalog.iter().all(|adventure| !filtered.matches(adventure)));
    assert!(catalog.iter().all(|adventure| unfiltered.matches(adventure)));
}

#[test]
fn predicate_set_serializes_with_op_tags() {
    let set = PredicateSet::from_predicates(vec![
        Predicate::equals("activity", "hiking"),
        Predicate::range("duration_hours", None, Some(3)),
    ]);
    let json = serde_json::to_value(&set).expect("serialize to json");
    assert_eq!(json["has_any_filter"], true);
    assert_eq!(json["predicates"][0]["op"], "equals");
    assert_eq!(json["predicates"][1]["op"], "range");
    assert_eq!(json["predicates"][1]["max"], 3);
    assert!(json["predicates"][1]["min"].is_null());
}

#[test]
fn in_memory_matching_uses_adventure_fields() {
    let mut adventure = Adventure::new("Inca Trail", "Cusco, Peru");
    adventure.country_slug = Some("peru".to_string());
    adventure.activity_slugs = vec!["hiking".to_string(), "camping".to_string()];
    adventure.duration_hours = Some(6.0);
    adventure
        .attributes
        .insert("season".to_string(), "dry".to_string());

    let mut state = FilterState {
        activity_slug: Some("camping".to_string()),
        country_slug: Some("peru".to_string()),
        duration: Some(DurationBucket::Long),
        ..FilterState::default()
    };
    state.extra_filters.set("season", "dry");
    assert!(build_predicates(&state).matches(&adventure));

    state.extra_filters.set("season", "wet");
    assert!(!build_predicates(&state).matches(&adventure));
}
