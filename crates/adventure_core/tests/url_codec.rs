use adventure_core::{
    build_predicates, decode, decode_url, decode_with_report, encode, DecodeIssue,
    DurationBucket, FilterState, HashToken, Predicate, Taxonomy, TaxonomyItem, TaxonomyKind,
    UrlParts, ViewMode,
};
use std::collections::BTreeSet;

fn taxonomy() -> Taxonomy {
    Taxonomy::new(
        vec![
            TaxonomyItem::new(TaxonomyKind::Activity, "Hiking").with_emoji("🥾"),
            TaxonomyItem::new(TaxonomyKind::Activity, "Rock Climbing"),
            TaxonomyItem::new(TaxonomyKind::Activity, "Jordan"),
        ],
        vec![
            TaxonomyItem::new(TaxonomyKind::Country, "Italy"),
            TaxonomyItem::new(TaxonomyKind::Country, "Peru"),
            TaxonomyItem::new(TaxonomyKind::Country, "Jordan"),
        ],
    )
}

fn parts(segments: &[&str], query: &[(&str, &str)], tokens: &[HashToken]) -> UrlParts {
    UrlParts::new(
        segments.iter().map(|segment| segment.to_string()).collect(),
        query
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        tokens.iter().copied().collect(),
    )
}

#[test]
fn scenario_two_segments_with_short_duration() {
    let state = decode(
        &parts(&["hiking", "italy"], &[("duration", "short")], &[]),
        &taxonomy(),
    );

    assert_eq!(state.activity_slug.as_deref(), Some("hiking"));
    assert_eq!(state.country_slug.as_deref(), Some("italy"));
    assert_eq!(state.duration, Some(DurationBucket::Short));
    assert_eq!(state.view_mode, ViewMode::List);

    let set = build_predicates(&state);
    assert_eq!(
        set.predicates,
        vec![
            Predicate::equals("activity", "hiking"),
            Predicate::equals("country", "italy"),
            Predicate::range("duration_hours", None, Some(3)),
        ]
    );
    assert!(set.has_any_filter);
}

#[test]
fn scenario_single_country_segment() {
    let report = decode_with_report(&parts(&["italy"], &[], &[]), &taxonomy());
    assert_eq!(report.state.country_slug.as_deref(), Some("italy"));
    assert_eq!(report.state.activity_slug, None);
    assert!(report.issues.is_empty());
}

#[test]
fn scenario_map_only_has_no_filter() {
    let state = decode(&parts(&[], &[], &[HashToken::Map]), &taxonomy());
    assert_eq!(state.activity_slug, None);
    assert_eq!(state.country_slug, None);
    assert_eq!(state.view_mode, ViewMode::Map);
    assert!(!build_predicates(&state).has_any_filter);
}

#[test]
fn scenario_encode_activity_with_long_duration() {
    let state = FilterState {
        activity_slug: Some("rock-climbing".to_string()),
        duration: Some(DurationBucket::Long),
        ..FilterState::default()
    };
    let encoded = encode(&state);
    assert_eq!(encoded.path_segments, vec!["rock-climbing".to_string()]);
    assert_eq!(
        encoded.query,
        vec![("duration".to_string(), "long".to_string())]
    );
    assert!(encoded.hash_tokens.is_empty());
    assert_eq!(encoded.to_url_string(), "/rock-climbing?duration=long");
}

#[test]
fn single_segment_unknown_to_countries_is_an_activity() {
    let state = decode(&parts(&["Rock Climbing"], &[], &[]), &taxonomy());
    assert_eq!(state.activity_slug.as_deref(), Some("rock-climbing"));
    assert_eq!(state.country_slug, None);
}

#[test]
fn unknown_single_segment_is_absent_and_reported() {
    let report = decode_with_report(&parts(&["surfing"], &[], &[]), &taxonomy());
    assert_eq!(report.state, FilterState::default());
    assert_eq!(
        report.issues,
        vec![DecodeIssue::UnresolvedSegment {
            segment: "surfing".to_string(),
            expected: TaxonomyKind::Activity,
        }]
    );
}

#[test]
fn ambiguous_single_segment_prefers_country() {
    let report = decode_with_report(&parts(&["jordan"], &[], &[]), &taxonomy());
    assert_eq!(report.state.country_slug.as_deref(), Some("jordan"));
    assert_eq!(report.state.activity_slug, None);
    assert_eq!(
        report.issues,
        vec![DecodeIssue::AmbiguousSingleSegment {
            slug: "jordan".to_string()
        }]
    );
}

#[test]
fn two_segments_are_positional_and_never_swapped() {
    let report = decode_with_report(&parts(&["italy", "hiking"], &[], &[]), &taxonomy());
    assert_eq!(report.state.activity_slug, None);
    assert_eq!(report.state.country_slug, None);
    assert_eq!(report.issues.len(), 2);

    let state = decode(&parts(&["jordan", "jordan"], &[], &[]), &taxonomy());
    assert_eq!(state.activity_slug.as_deref(), Some("jordan"));
    assert_eq!(state.country_slug.as_deref(), Some("jordan"));
}

#[test]
fn deep_paths_keep_the_first_two_segments() {
    let report = decode_with_report(
        &parts(&["hiking", "peru", "extra", "more"], &[], &[]),
        &taxonomy(),
    );
    assert_eq!(report.state.activity_slug.as_deref(), Some("hiking"));
    assert_eq!(report.state.country_slug.as_deref(), Some("peru"));
    assert_eq!(
        report.issues,
        vec![DecodeIssue::UnrecognizedDeepPath {
            dropped: vec!["extra".to_string(), "more".to_string()]
        }]
    );
}

#[test]
fn malformed_duration_is_ignored_entirely() {
    let report = decode_with_report(
        &parts(&[], &[("duration", "SHORT"), ("age", "18+")], &[]),
        &taxonomy(),
    );
    assert_eq!(report.state.duration, None);
    assert_eq!(report.state.age.as_deref(), Some("18+"));
    assert!(report.state.extra_filters.is_empty());
    assert_eq!(
        report.issues,
        vec![DecodeIssue::MalformedDuration {
            value: "SHORT".to_string()
        }]
    );
}

#[test]
fn unknown_keys_pass_through_in_first_seen_order() {
    let report = decode_with_report(
        &parts(
            &[],
            &[
                ("season", "summer"),
                ("group", "family"),
                ("season", "winter"),
                ("empty", ""),
            ],
            &[],
        ),
        &taxonomy(),
    );
    let extras: Vec<_> = report.state.extra_filters.iter().collect();
    assert_eq!(extras, vec![("season", "summer"), ("group", "family")]);
    assert_eq!(
        report.issues,
        vec![
            DecodeIssue::UnknownQueryKey {
                key: "season".to_string()
            },
            DecodeIssue::UnknownQueryKey {
                key: "group".to_string()
            },
        ]
    );
}

#[test]
fn empty_taxonomy_yields_absent_state_and_issue() {
    let report = decode_with_report(&parts(&["hiking", "italy"], &[], &[]), &Taxonomy::default());
    assert_eq!(report.state.activity_slug, None);
    assert_eq!(report.state.country_slug, None);
    assert_eq!(report.issues[0], DecodeIssue::UnavailableTaxonomy);
}

#[test]
fn hash_tokens_render_expanded_then_map() {
    let state = FilterState {
        view_mode: ViewMode::Map,
        expanded: true,
        ..FilterState::default()
    };
    assert_eq!(encode(&state).to_url_string(), "/#expandedmap");

    for fragment in ["#mapexpanded", "#expandedmap"] {
        let decoded = decode_url(&format!("/{fragment}"), &taxonomy()).state;
        assert_eq!(decoded, state);
    }
}

#[test]
fn query_order_is_fixed_on_encode() {
    let mut state = FilterState {
        country_slug: Some("peru".to_string()),
        duration: Some(DurationBucket::Medium),
        age: Some("18+".to_string()),
        strenuousness: Some("hard".to_string()),
        ..FilterState::default()
    };
    state.extra_filters.set("season", "summer");
    state.extra_filters.set("group size", "2 - 4");

    let url = encode(&state).to_url_string();
    assert_eq!(
        url,
        "/peru?duration=medium&age=18%2B&strenuousness=hard&season=summer&group+size=2+-+4"
    );
    assert_eq!(decode_url(&url, &taxonomy()).state, state);
}

#[test]
fn reserved_keys_in_extras_are_not_encoded_twice() {
    let mut state = FilterState {
        duration: Some(DurationBucket::Short),
        ..FilterState::default()
    };
    state.extra_filters.set("duration", "long");
    assert_eq!(encode(&state).to_url_string(), "/?duration=short");
}

#[test]
fn activity_only_state_colliding_with_a_country_does_not_round_trip() {
    let state = FilterState {
        activity_slug: Some("jordan".to_string()),
        ..FilterState::default()
    };
    let decoded = decode(&encode(&state), &taxonomy());
    assert_eq!(decoded.activity_slug, None);
    assert_eq!(decoded.country_slug.as_deref(), Some("jordan"));
}

#[test]
fn full_url_strings_are_percent_decoded() {
    let report = decode_url("/Rock%20Climbing/Italy?age=18%2B#map", &taxonomy());
    assert_eq!(report.state.activity_slug.as_deref(), Some("rock-climbing"));
    assert_eq!(report.state.country_slug.as_deref(), Some("italy"));
    assert_eq!(report.state.age.as_deref(), Some("18+"));
    assert_eq!(report.state.view_mode, ViewMode::Map);

    let canonical = encode(&report.state);
    assert_eq!(canonical.to_url_string(), "/rock-climbing/italy?age=18%2B#map");
    assert_eq!(
        canonical.hash_tokens,
        [HashToken::Map].into_iter().collect::<BTreeSet<_>>()
    );
}

#[test]
fn doubled_leading_slashes_keep_every_segment() {
    let report = decode_url("//hiking/peru", &taxonomy());
    assert_eq!(report.state.activity_slug.as_deref(), Some("hiking"));
    assert_eq!(report.state.country_slug.as_deref(), Some("peru"));
    assert!(report.issues.is_empty());

    let report = decode_url("///peru", &taxonomy());
    assert_eq!(report.state.activity_slug, None);
    assert_eq!(report.state.country_slug.as_deref(), Some("peru"));
}
