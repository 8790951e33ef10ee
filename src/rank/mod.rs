//! Hot-spot ranking
//!
//! Orders places for the "Hot Spots Now" list. With a viewer location the
//! order is nearest first; without one it falls back to popularity:
//! post count, then most recent post, then name.

pub mod picker;

pub use picker::{hot_spots_for_category, places_for_category};

use crate::error::Result;
use crate::geo::distance::haversine_distance_km;
use crate::geo::GeoPoint;
use crate::model::{Place, Post};
use chrono::{DateTime, Utc};
use icu_normalizer::DecomposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Which ordering strategy produced a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Nearest first, from a known viewer location
    Distance,
    /// Most posted, then most recent, then by name
    Popularity,
}

impl RankMode {
    /// Mode selected by whether the viewer location is known
    pub fn for_viewer(viewer: Option<GeoPoint>) -> Self {
        if viewer.is_some() {
            Self::Distance
        } else {
            Self::Popularity
        }
    }
}

impl std::fmt::Display for RankMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distance => write!(f, "distance"),
            Self::Popularity => write!(f, "popularity"),
        }
    }
}

/// Per-place annotation attached by the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rank_mode", rename_all = "snake_case")]
pub enum Ranking {
    Distance {
        /// Great-circle distance from the viewer; `None` when the place has no usable location
        distance_km: Option<f64>,
    },
    Popularity {
        post_count: usize,
        /// Most recent post time; `None` when the place has no posts
        latest_post_time: Option<DateTime<Utc>>,
    },
}

/// A place annotated for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlace {
    #[serde(flatten)]
    pub place: Place,
    #[serde(flatten)]
    pub ranking: Ranking,
}

impl RankedPlace {
    pub fn distance_km(&self) -> Option<f64> {
        match self.ranking {
            Ranking::Distance { distance_km } => distance_km,
            Ranking::Popularity { .. } => None,
        }
    }

    pub fn post_count(&self) -> Option<usize> {
        match self.ranking {
            Ranking::Popularity { post_count, .. } => Some(post_count),
            Ranking::Distance { .. } => None,
        }
    }

    pub fn latest_post_time(&self) -> Option<DateTime<Utc>> {
        match self.ranking {
            Ranking::Popularity { latest_post_time, .. } => latest_post_time,
            Ranking::Distance { .. } => None,
        }
    }
}

/// Post statistics for one place name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceStats {
    pub count: usize,
    pub latest: DateTime<Utc>,
}

/// Count posts and find the latest post time per place name
///
/// Posts without a place name are skipped. The latest time uses each post's
/// capture time, falling back to upload time and then the epoch.
pub fn aggregate_place_stats(posts: &[Post]) -> HashMap<String, PlaceStats> {
    let mut stats: HashMap<String, PlaceStats> = HashMap::new();

    for post in posts {
        let Some(name) = post.place_name() else {
            continue;
        };
        let time = post.recency_time();

        stats
            .entry(name.to_string())
            .and_modify(|s| {
                s.count += 1;
                if time > s.latest {
                    s.latest = time;
                }
            })
            .or_insert(PlaceStats { count: 1, latest: time });
    }

    stats
}

/// Compare display names the way a user expects a sorted list to read
///
/// Three levels, as in a collation table:
/// 1. base letters, ignoring accents and case ("Cafe" == "Café" == "CAFE")
/// 2. accents, unaccented first ("cafe" < "café")
/// 3. case, lowercase first ("cafe" < "Cafe")
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a, b) = (decompose(a), decompose(b));

    fold_case(&a, false)
        .cmp(&fold_case(&b, false))
        .then_with(|| fold_case(&a, true).cmp(&fold_case(&b, true)))
        .then_with(|| b.cmp(&a))
}

/// Canonical decomposition (NFD) of a name
fn decompose(name: &str) -> Vec<char> {
    DecomposingNormalizerBorrowed::new_nfd()
        .normalize_iter(name.chars())
        .collect()
}

/// Lowercase a decomposed name, optionally dropping its accents
fn fold_case(chars: &[char], keep_accents: bool) -> Vec<char> {
    chars
        .iter()
        .filter(|c| keep_accents || !is_combining_mark(**c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Combining diacritical mark blocks left behind by decomposition
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Distance from the viewer to a place, treating unusable locations as missing
pub(crate) fn distance_to(viewer: GeoPoint, place: &Place) -> Option<f64> {
    let location = place.location?;
    match haversine_distance_km(viewer, location) {
        Ok(km) => Some(km),
        Err(e) => {
            warn!(place_id = %place.id, "Treating place as location-less: {}", e);
            None
        }
    }
}

/// Ascending by distance; places without a distance go last, keeping their order
pub(crate) fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rank places for display
///
/// # Arguments
/// * `places` - Places to order
/// * `posts` - Posts used for popularity statistics (ignored in distance mode)
/// * `viewer` - Viewer location; selects distance mode when present
///
/// # Returns
/// The places in display order, or `InvalidGeoPoint` if the viewer location
/// is invalid. Invalid place locations never fail the call.
pub fn rank_places(
    places: &[Place],
    posts: &[Post],
    viewer: Option<GeoPoint>,
) -> Result<Vec<RankedPlace>> {
    let ranked = match viewer {
        Some(viewer) => rank_by_distance(places, viewer)?,
        None => rank_by_popularity(places, posts),
    };

    debug!(
        mode = %RankMode::for_viewer(viewer),
        places = ranked.len(),
        "Ranked places"
    );
    Ok(ranked)
}

fn rank_by_distance(places: &[Place], viewer: GeoPoint) -> Result<Vec<RankedPlace>> {
    viewer.validate()?;

    let mut ranked: Vec<RankedPlace> = places
        .iter()
        .map(|place| RankedPlace {
            place: place.clone(),
            ranking: Ranking::Distance {
                distance_km: distance_to(viewer, place),
            },
        })
        .collect();

    // sort_by is stable, so location-less places keep their input order
    ranked.sort_by(|a, b| by_distance(a.distance_km(), b.distance_km()));
    Ok(ranked)
}

fn rank_by_popularity(places: &[Place], posts: &[Post]) -> Vec<RankedPlace> {
    // Matched by display name, not id: identically named places share stats
    let stats = aggregate_place_stats(posts);

    let mut ranked: Vec<RankedPlace> = places
        .iter()
        .map(|place| {
            let (post_count, latest_post_time) = stats
                .get(&place.name)
                .map(|s| (s.count, Some(s.latest)))
                .unwrap_or((0, None));

            RankedPlace {
                place: place.clone(),
                ranking: Ranking::Popularity {
                    post_count,
                    latest_post_time,
                },
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.post_count()
            .cmp(&a.post_count())
            .then_with(|| b.latest_post_time().cmp(&a.latest_post_time()))
            .then_with(|| compare_names(&a.place.name, &b.place.name))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn names(ranked: &[RankedPlace]) -> Vec<&str> {
        ranked.iter().map(|r| r.place.name.as_str()).collect()
    }

    fn post_at(id: &str, place: &str, time: DateTime<Utc>) -> Post {
        Post::new(id).with_place_name(place).with_captured_at(time)
    }

    #[test]
    fn test_empty_places() {
        assert!(rank_places(&[], &[], None).unwrap().is_empty());
        let viewer = GeoPoint::new(37.5, 127.0);
        assert!(rank_places(&[], &[], Some(viewer)).unwrap().is_empty());
    }

    #[test]
    fn test_distance_mode_orders_nearest_first() {
        let viewer = GeoPoint::new(37.544, 127.055);
        let places = vec![
            Place::new("1", "Far").with_location(37.60, 127.10),
            Place::new("2", "Unknown A"),
            Place::new("3", "Near").with_location(37.545, 127.056),
            Place::new("4", "Unknown B"),
            Place::new("5", "Middle").with_location(37.56, 127.06),
        ];

        let ranked = rank_places(&places, &[], Some(viewer)).unwrap();

        assert_eq!(names(&ranked), vec!["Near", "Middle", "Far", "Unknown A", "Unknown B"]);

        let distances: Vec<f64> = ranked.iter().filter_map(|r| r.distance_km()).collect();
        assert_eq!(distances.len(), 3);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert!(ranked[3].distance_km().is_none());
        assert!(ranked[4].distance_km().is_none());
    }

    #[test]
    fn test_distance_mode_ignores_post_stats() {
        let viewer = GeoPoint::new(37.544, 127.055);
        let places = vec![
            Place::new("1", "Popular").with_location(37.60, 127.10),
            Place::new("2", "Quiet").with_location(37.545, 127.055),
        ];
        let posts: Vec<Post> = (0..5)
            .map(|i| post_at(&i.to_string(), "Popular", at(1, 10)))
            .collect();

        let ranked = rank_places(&places, &posts, Some(viewer)).unwrap();
        assert_eq!(names(&ranked), vec!["Quiet", "Popular"]);
        assert!(ranked[0].post_count().is_none());
    }

    #[test]
    fn test_distance_mode_treats_invalid_place_location_as_missing() {
        let viewer = GeoPoint::new(37.544, 127.055);
        let places = vec![
            Place::new("1", "Broken").with_location(f64::NAN, 127.0),
            Place::new("2", "Fine").with_location(37.55, 127.06),
        ];

        let ranked = rank_places(&places, &[], Some(viewer)).unwrap();
        assert_eq!(names(&ranked), vec!["Fine", "Broken"]);
        assert!(ranked[1].distance_km().is_none());
    }

    #[test]
    fn test_invalid_viewer_is_an_error() {
        let places = vec![Place::new("1", "A").with_location(37.5, 127.0)];
        let result = rank_places(&places, &[], Some(GeoPoint::new(120.0, 0.0)));
        assert!(matches!(result, Err(Error::InvalidGeoPoint(_))));
    }

    #[test]
    fn test_popularity_primary_sort_by_count() {
        let places = vec![Place::new("b", "B"), Place::new("a", "A")];
        let mut posts: Vec<Post> = (0..2)
            .map(|i| post_at(&format!("b{}", i), "B", at(20, 10)))
            .collect();
        posts.extend((0..5).map(|i| post_at(&format!("a{}", i), "A", at(1, 10))));

        let ranked = rank_places(&places, &posts, None).unwrap();

        // A has more posts even though B's are more recent
        assert_eq!(names(&ranked), vec!["A", "B"]);
        assert_eq!(ranked[0].post_count(), Some(5));
        assert_eq!(ranked[1].post_count(), Some(2));
    }

    #[test]
    fn test_popularity_recency_breaks_count_ties() {
        let places = vec![Place::new("1", "Older"), Place::new("2", "Newer")];
        let posts = vec![
            post_at("1", "Older", at(1, 10)),
            post_at("2", "Newer", at(2, 10)),
        ];

        let ranked = rank_places(&places, &posts, None).unwrap();
        assert_eq!(names(&ranked), vec!["Newer", "Older"]);
        assert_eq!(ranked[0].latest_post_time(), Some(at(2, 10)));
    }

    #[test]
    fn test_popularity_name_breaks_full_ties() {
        let places = vec![Place::new("z", "Zeta"), Place::new("a", "Alpha")];
        let mut posts = Vec::new();
        for i in 0..3 {
            posts.push(post_at(&format!("z{}", i), "Zeta", at(5, 12)));
            posts.push(post_at(&format!("a{}", i), "Alpha", at(5, 12)));
        }

        let ranked = rank_places(&places, &posts, None).unwrap();
        assert_eq!(names(&ranked), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_popularity_places_without_posts_sort_last_by_name() {
        let places = vec![
            Place::new("1", "delta"),
            Place::new("2", "Charlie"),
            Place::new("3", "Busy"),
        ];
        let posts = vec![Post::new("p").with_place_name("Busy")];

        let ranked = rank_places(&places, &posts, None).unwrap();
        assert_eq!(names(&ranked), vec!["Busy", "Charlie", "delta"]);
        assert_eq!(ranked[1].post_count(), Some(0));
        assert_eq!(ranked[1].latest_post_time(), None);
        // Busy has a post with no timestamps: counted at the epoch
        assert_eq!(ranked[0].latest_post_time().map(|t| t.timestamp()), Some(0));
    }

    #[test]
    fn test_popularity_matches_by_name_not_id() {
        let places = vec![
            Place::new("1", "Popup"),
            Place::new("2", "Popup"),
            Place::new("3", "Other"),
        ];
        let posts = vec![
            post_at("a", "Popup", at(1, 10)).with_place_id("1"),
            post_at("b", "Popup", at(1, 11)).with_place_id("1"),
            post_at("c", "Other", at(1, 12)).with_place_id("3"),
        ];

        let ranked = rank_places(&places, &posts, None).unwrap();

        // Both "Popup" places get the same statistics
        assert_eq!(ranked[0].post_count(), Some(2));
        assert_eq!(ranked[1].post_count(), Some(2));
        assert_eq!(ranked[0].place.id, "1");
        assert_eq!(ranked[1].place.id, "2");
        assert_eq!(ranked[2].place.name, "Other");
    }

    #[test]
    fn test_popularity_skips_malformed_posts() {
        let places = vec![Place::new("1", "A")];
        let posts = vec![
            Post::new("no-name").with_captured_at(at(3, 10)),
            Post::new("empty-name").with_place_name("").with_captured_at(at(3, 10)),
            post_at("ok", "A", at(1, 10)),
            post_at("unknown-place", "Elsewhere", at(4, 10)),
        ];

        let ranked = rank_places(&places, &posts, None).unwrap();
        assert_eq!(ranked[0].post_count(), Some(1));
        assert_eq!(ranked[0].latest_post_time(), Some(at(1, 10)));
    }

    #[test]
    fn test_aggregate_uses_time_fallback_chain() {
        let posts = vec![
            Post::new("1").with_place_name("A").with_uploaded_at(at(9, 0)),
            Post::new("2")
                .with_place_name("A")
                .with_captured_at(at(2, 0))
                .with_uploaded_at(at(10, 0)),
            Post::new("3").with_place_name("A"),
        ];

        let stats = aggregate_place_stats(&posts);
        let a = stats["A"];
        assert_eq!(a.count, 3);
        // Capture time wins over upload time for post 2, so post 1 is the latest
        assert_eq!(a.latest, at(9, 0));
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("Alpha", "Zeta"), Ordering::Less);
        assert_eq!(compare_names("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_names("Beta", "alpha"), Ordering::Greater);
        assert_eq!(compare_names("cafe", "Cafe"), Ordering::Less);
        assert_eq!(compare_names("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_ignores_accents_first() {
        assert_eq!(compare_names("Café A", "Cafe B"), Ordering::Less);
        assert_eq!(compare_names("Cafe B", "Café A"), Ordering::Greater);
        assert_eq!(compare_names("École", "Zeta"), Ordering::Less);
        assert_eq!(compare_names("Ångström", "Bar"), Ordering::Less);
    }

    #[test]
    fn test_compare_names_accent_then_case() {
        assert_eq!(compare_names("cafe", "café"), Ordering::Less);
        assert_eq!(compare_names("café", "Cafe"), Ordering::Greater);
        assert_eq!(compare_names("café", "Café"), Ordering::Less);
        assert_eq!(compare_names("caf\u{e9}", "cafe\u{301}"), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_hangul() {
        assert_eq!(compare_names("가게", "나무"), Ordering::Less);
        assert_eq!(compare_names("카페", "가게"), Ordering::Greater);
    }

    #[test]
    fn test_popularity_ties_sort_accented_names_by_base_letters() {
        let places = vec![
            Place::new("1", "Zeta"),
            Place::new("2", "École"),
            Place::new("3", "Dome"),
        ];

        let ranked = rank_places(&places, &[], None).unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.place.name.as_str()).collect();
        assert_eq!(names, vec!["Dome", "École", "Zeta"]);
    }

    #[test]
    fn test_ranked_place_serialization() {
        let ranked = RankedPlace {
            place: Place::new("1", "A").with_location(37.5, 127.0),
            ranking: Ranking::Distance { distance_km: Some(1.5) },
        };

        let value = serde_json::to_value(&ranked).unwrap();
        assert_eq!(value["name"], "A");
        assert_eq!(value["rank_mode"], "distance");
        assert_eq!(value["distance_km"], 1.5);
    }
}
