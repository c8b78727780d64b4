use adventure_core::codec::resolver::{match_segment, resolve_as};
use adventure_core::{resolve_segment, slugify, Resolution, Taxonomy, TaxonomyItem, TaxonomyKind};

fn taxonomy() -> Taxonomy {
    Taxonomy::new(
        vec![
            TaxonomyItem::new(TaxonomyKind::Activity, "Hiking"),
            TaxonomyItem::new(TaxonomyKind::Activity, "Scuba  Diving").with_emoji("🤿"),
            TaxonomyItem::new(TaxonomyKind::Activity, "Georgia"),
        ],
        vec![
            TaxonomyItem::new(TaxonomyKind::Country, "New Zealand"),
            TaxonomyItem::new(TaxonomyKind::Country, "Georgia"),
        ],
    )
}

#[test]
fn resolves_each_kind_without_collisions() {
    let taxonomy = taxonomy();

    match resolve_segment("hiking", &taxonomy) {
        Resolution::Activity(item) => assert_eq!(item.name, "Hiking"),
        other => panic!("expected activity, got {other:?}"),
    }
    match resolve_segment("new-zealand", &taxonomy) {
        Resolution::Country(item) => assert_eq!(item.name, "New Zealand"),
        other => panic!("expected country, got {other:?}"),
    }
}

#[test]
fn matching_is_case_and_whitespace_insensitive_but_exact() {
    let taxonomy = taxonomy();
    assert_eq!(
        resolve_segment("  SCUBA diving ", &taxonomy).kind(),
        Some(TaxonomyKind::Activity)
    );
    assert_eq!(
        resolve_segment("New   Zealand", &taxonomy).kind(),
        Some(TaxonomyKind::Country)
    );
    assert_eq!(resolve_segment("hik", &taxonomy), Resolution::Unresolved);
    assert_eq!(resolve_segment("hiking-trips", &taxonomy), Resolution::Unresolved);
    assert_eq!(resolve_segment("", &taxonomy), Resolution::Unresolved);
}

#[test]
fn shared_slug_is_ambiguous_and_resolves_to_country() {
    let taxonomy = taxonomy();
    let matches = match_segment("georgia", &taxonomy);
    assert!(matches.is_ambiguous());
    assert_eq!(matches.resolution().kind(), Some(TaxonomyKind::Country));

    let activity = resolve_as("georgia", TaxonomyKind::Activity, &taxonomy)
        .expect("georgia is also an activity");
    assert_eq!(activity.kind, TaxonomyKind::Activity);
}

#[test]
fn empty_taxonomy_resolves_nothing() {
    assert_eq!(
        resolve_segment("hiking", &Taxonomy::default()),
        Resolution::Unresolved
    );
}

#[test]
fn slugs_and_labels_follow_display_names() {
    let taxonomy = taxonomy();
    let scuba = &taxonomy.activities[1];
    assert_eq!(scuba.slug(), "scuba-diving");
    assert_eq!(scuba.label(), "🤿 Scuba  Diving");
    assert_eq!(taxonomy.countries[0].label(), "New Zealand");
    assert_eq!(slugify("\tNew\n Zealand "), "new-zealand");
}
