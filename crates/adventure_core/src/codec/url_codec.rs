//! URL <-> filter-state codec.
//!
//! # Responsibility
//! - Decode path segments, query pairs and hash tokens into one canonical
//!   `FilterState`.
//! - Encode a `FilterState` back into URL parts for the router.
//!
//! # Invariants
//! - Decoding never fails; every anomaly becomes a `DecodeIssue`.
//! - Two path segments are positional: activity first, country second.
//! - A single segment that names a country is a country, otherwise it is
//!   tried as an activity.
//! - `decode(encode(s)) == s` for every state produced by `decode`, except an
//!   activity-only state whose slug is also a country slug (country priority
//!   makes that state inexpressible as a single segment).

use crate::codec::resolver::{match_segment, resolve_as, Resolution};
use crate::model::filter_state::{DurationBucket, FilterState, ViewMode};
use crate::model::taxonomy::{slugify, Taxonomy, TaxonomyKind};
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use url::form_urlencoded;
use url::Url;

pub const QUERY_DURATION: &str = "duration";
pub const QUERY_AGE: &str = "age";
pub const QUERY_STRENUOUSNESS: &str = "strenuousness";

/// Query keys with dedicated `FilterState` fields.
pub const RESERVED_QUERY_KEYS: &[&str] = &[QUERY_DURATION, QUERY_AGE, QUERY_STRENUOUSNESS];

const MAX_PATH_SEGMENTS: usize = 2;

const URL_ORIGIN: &str = "http://localhost";

static URL_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse(&format!("{URL_ORIGIN}/")).expect("valid url base"));

/// Flags carried in the URL fragment.
///
/// Ordering is the render order: `expanded` before `map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashToken {
    Expanded,
    Map,
}

impl HashToken {
    pub const ALL: [HashToken; 2] = [Self::Expanded, Self::Map];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Map => "map",
        }
    }

    /// Scans a raw fragment for known tokens.
    ///
    /// Tokens are concatenated without separators, so `expandedmap`,
    /// `mapexpanded` and `#map` are all recognized. Leading `#` is ignored.
    pub fn parse_fragment(fragment: &str) -> BTreeSet<HashToken> {
        let fragment = fragment.trim_start_matches('#');
        Self::ALL
            .into_iter()
            .filter(|token| fragment.contains(token.as_str()))
            .collect()
    }
}

/// The three URL-derived representations, decoded but not yet interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlParts {
    pub path_segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub hash_tokens: BTreeSet<HashToken>,
}

impl UrlParts {
    pub fn new(
        path_segments: Vec<String>,
        query: Vec<(String, String)>,
        hash_tokens: BTreeSet<HashToken>,
    ) -> Self {
        Self {
            path_segments,
            query,
            hash_tokens,
        }
    }

    /// Splits a relative or absolute URL into its parts.
    ///
    /// Path segments and query pairs are percent-decoded. An unparsable input
    /// yields empty parts (and a warning), never an error.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        // Rooted paths are pinned to the origin so a leading `//` stays a path
        // instead of turning into a host.
        let parsed = if raw.starts_with('/') {
            Url::parse(&format!("{URL_ORIGIN}{raw}"))
        } else {
            Url::options().base_url(Some(&*URL_BASE)).parse(raw)
        };
        let url = match parsed {
            Ok(url) => url,
            Err(err) => {
                warn!("event=url_parse module=codec status=error error={err}");
                return Self::default();
            }
        };

        let path_segments = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(decode_path_segment)
                    .collect()
            })
            .unwrap_or_default();
        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        let hash_tokens = url
            .fragment()
            .map(HashToken::parse_fragment)
            .unwrap_or_default();

        Self {
            path_segments,
            query,
            hash_tokens,
        }
    }

    /// `/seg1/seg2`, or `/` when there are no segments.
    pub fn path(&self) -> String {
        let encoded = self
            .path_segments
            .iter()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{encoded}")
    }

    /// `application/x-www-form-urlencoded` query without the leading `?`.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    /// Concatenated hash tokens without the leading `#`.
    pub fn fragment(&self) -> String {
        self.hash_tokens
            .iter()
            .map(|token| token.as_str())
            .collect()
    }

    /// Full relative URL for the navigation collaborator.
    pub fn to_url_string(&self) -> String {
        let mut url = self.path();
        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        let fragment = self.fragment();
        if !fragment.is_empty() {
            url.push('#');
            url.push_str(&fragment);
        }
        url
    }
}

fn decode_path_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Non-fatal anomaly observed while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DecodeIssue {
    /// Segment matched nothing in the kind its position expects.
    UnresolvedSegment {
        segment: String,
        expected: TaxonomyKind,
    },
    /// Key has no dedicated field; kept as an extra filter.
    UnknownQueryKey { key: String },
    /// `duration` outside `short|medium|long`; ignored.
    MalformedDuration { value: String },
    /// Single segment names both an activity and a country; country won.
    AmbiguousSingleSegment { slug: String },
    /// Both reference collections were empty.
    UnavailableTaxonomy,
    /// Segments beyond the second were dropped.
    UnrecognizedDeepPath { dropped: Vec<String> },
}

/// Decoded state plus every issue observed on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    pub state: FilterState,
    pub issues: Vec<DecodeIssue>,
}

/// Decodes URL parts into canonical filter state.
pub fn decode(parts: &UrlParts, taxonomy: &Taxonomy) -> FilterState {
    decode_with_report(parts, taxonomy).state
}

/// Parses and decodes a raw URL string.
pub fn decode_url(raw: &str, taxonomy: &Taxonomy) -> DecodeReport {
    decode_with_report(&UrlParts::parse(raw), taxonomy)
}

/// Decodes URL parts and reports every fail-open decision taken.
pub fn decode_with_report(parts: &UrlParts, taxonomy: &Taxonomy) -> DecodeReport {
    let mut state = FilterState::default();
    let mut issues = Vec::new();

    if taxonomy.is_empty() {
        warn!("event=filter_decode module=codec status=degraded reason=taxonomy_unavailable");
        issues.push(DecodeIssue::UnavailableTaxonomy);
    }

    let segments: Vec<&str> = parts
        .path_segments
        .iter()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() > MAX_PATH_SEGMENTS {
        let dropped: Vec<String> = segments[MAX_PATH_SEGMENTS..]
            .iter()
            .map(|segment| (*segment).to_string())
            .collect();
        debug!(
            "event=filter_decode module=codec status=lossy reason=deep_path dropped={}",
            dropped.len()
        );
        issues.push(DecodeIssue::UnrecognizedDeepPath { dropped });
    }

    match segments.as_slice() {
        [] => {}
        [single] => decode_single_segment(single, taxonomy, &mut state, &mut issues),
        [activity, country, ..] => {
            state.activity_slug =
                decode_positional(activity, TaxonomyKind::Activity, taxonomy, &mut issues);
            state.country_slug =
                decode_positional(country, TaxonomyKind::Country, taxonomy, &mut issues);
        }
    }

    decode_query(&parts.query, &mut state, &mut issues);

    state.view_mode = if parts.hash_tokens.contains(&HashToken::Map) {
        ViewMode::Map
    } else {
        ViewMode::List
    };
    state.expanded = parts.hash_tokens.contains(&HashToken::Expanded);

    debug!(
        "event=filter_decode module=codec status=ok segments={} query_pairs={} issues={}",
        segments.len(),
        parts.query.len(),
        issues.len()
    );

    DecodeReport { state, issues }
}

fn decode_single_segment(
    segment: &str,
    taxonomy: &Taxonomy,
    state: &mut FilterState,
    issues: &mut Vec<DecodeIssue>,
) {
    let matches = match_segment(segment, taxonomy);
    if matches.is_ambiguous() {
        let slug = slugify(segment);
        warn!(
            "event=segment_resolve module=codec status=ambiguous policy=country_priority slug={slug}"
        );
        issues.push(DecodeIssue::AmbiguousSingleSegment { slug });
    }

    match matches.resolution() {
        Resolution::Country(item) => state.country_slug = Some(item.slug()),
        Resolution::Activity(item) => state.activity_slug = Some(item.slug()),
        Resolution::Unresolved => {
            // Unknown single tokens fall to the activity slot, which then misses.
            issues.push(DecodeIssue::UnresolvedSegment {
                segment: segment.to_string(),
                expected: TaxonomyKind::Activity,
            });
        }
    }
}

fn decode_positional(
    segment: &str,
    kind: TaxonomyKind,
    taxonomy: &Taxonomy,
    issues: &mut Vec<DecodeIssue>,
) -> Option<String> {
    match resolve_as(segment, kind, taxonomy) {
        Some(item) => Some(item.slug()),
        None => {
            issues.push(DecodeIssue::UnresolvedSegment {
                segment: segment.to_string(),
                expected: kind,
            });
            None
        }
    }
}

fn decode_query(
    query: &[(String, String)],
    state: &mut FilterState,
    issues: &mut Vec<DecodeIssue>,
) {
    let mut seen = HashSet::new();
    for (key, value) in query {
        // Repeated keys: the first occurrence decides.
        if !seen.insert(key.as_str()) {
            continue;
        }
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            QUERY_DURATION => match DurationBucket::parse(value) {
                Some(bucket) => state.duration = Some(bucket),
                None => issues.push(DecodeIssue::MalformedDuration {
                    value: value.clone(),
                }),
            },
            QUERY_AGE => state.age = Some(value.clone()),
            QUERY_STRENUOUSNESS => state.strenuousness = Some(value.clone()),
            _ => {
                state.extra_filters.insert_first(key.as_str(), value.as_str());
                issues.push(DecodeIssue::UnknownQueryKey { key: key.clone() });
            }
        }
    }
}

/// Encodes filter state into URL parts, omitting defaults and empty fields.
pub fn encode(state: &FilterState) -> UrlParts {
    let path_segments = [&state.activity_slug, &state.country_slug]
        .into_iter()
        .flatten()
        .filter(|slug| !slug.is_empty())
        .cloned()
        .collect();

    let mut query = Vec::new();
    if let Some(duration) = state.duration {
        query.push((QUERY_DURATION.to_string(), duration.as_str().to_string()));
    }
    push_non_empty(&mut query, QUERY_AGE, state.age.as_deref());
    push_non_empty(&mut query, QUERY_STRENUOUSNESS, state.strenuousness.as_deref());
    for (key, value) in state.extra_filters.iter() {
        if RESERVED_QUERY_KEYS.contains(&key) {
            warn!("event=filter_encode module=codec status=skipped reason=reserved_extra_key key={key}");
            continue;
        }
        push_non_empty(&mut query, key, Some(value));
    }

    let mut hash_tokens = BTreeSet::new();
    if state.expanded {
        hash_tokens.insert(HashToken::Expanded);
    }
    if state.view_mode == ViewMode::Map {
        hash_tokens.insert(HashToken::Map);
    }

    UrlParts {
        path_segments,
        query,
        hash_tokens,
    }
}

fn push_non_empty(query: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        query.push((key.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::{HashToken, UrlParts};

    #[test]
    fn fragment_tokens_are_found_in_any_order() {
        let tokens = HashToken::parse_fragment("#mapexpanded");
        assert!(tokens.contains(&HashToken::Map));
        assert!(tokens.contains(&HashToken::Expanded));
        assert!(HashToken::parse_fragment("").is_empty());
    }

    #[test]
    fn parse_decodes_path_query_and_fragment() {
        let parts = UrlParts::parse("/rock%20climbing/italy?age=18%2B&x=a+b#expandedmap");
        assert_eq!(parts.path_segments, vec!["rock climbing", "italy"]);
        assert_eq!(
            parts.query,
            vec![
                ("age".to_string(), "18+".to_string()),
                ("x".to_string(), "a b".to_string()),
            ]
        );
        assert_eq!(parts.hash_tokens.len(), 2);
    }

    #[test]
    fn repeated_leading_slashes_stay_in_the_path() {
        assert_eq!(
            UrlParts::parse("//hiking/peru").path_segments,
            vec!["hiking", "peru"]
        );
        assert_eq!(UrlParts::parse("///peru").path_segments, vec!["peru"]);
        assert_eq!(
            UrlParts::parse("//hiking?duration=short#map").to_url_string(),
            "/hiking?duration=short#map"
        );
    }

    #[test]
    fn to_url_string_omits_empty_sections() {
        assert_eq!(UrlParts::default().to_url_string(), "/");
        let parts = UrlParts::parse("https://example.com/hiking?duration=short#map");
        assert_eq!(parts.to_url_string(), "/hiking?duration=short#map");
    }
}
