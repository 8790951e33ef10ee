//! Category-scoped place lists
//!
//! The post-composition place picker and the per-category "Hot Spots Now"
//! tabs both work on one category at a time.

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::model::{Place, DEFAULT_CATEGORY};
use crate::rank::{by_distance, compare_names, distance_to, RankedPlace, Ranking};

/// Places offered in the place picker for a category
///
/// The catch-all category offers no places (the user types a name instead).
/// With a viewer location the list is nearest first, places without a
/// location last and alphabetical among themselves. Without one it is
/// alphabetical. Entries carry a distance ranking either way; the distance
/// is `None` when unknown.
pub fn places_for_category(
    places: &[Place],
    category: &str,
    viewer: Option<GeoPoint>,
) -> Result<Vec<RankedPlace>> {
    if category.is_empty() || category == DEFAULT_CATEGORY {
        return Ok(Vec::new());
    }
    if let Some(viewer) = viewer {
        viewer.validate()?;
    }

    let mut picked: Vec<RankedPlace> = places
        .iter()
        .filter(|place| place.category == category)
        .map(|place| RankedPlace {
            place: place.clone(),
            ranking: Ranking::Distance {
                distance_km: viewer.and_then(|v| distance_to(v, place)),
            },
        })
        .collect();

    match viewer {
        Some(_) => picked.sort_by(|a, b| match (a.distance_km(), b.distance_km()) {
            (None, None) => compare_names(&a.place.name, &b.place.name),
            (da, db) => by_distance(da, db),
        }),
        None => picked.sort_by(|a, b| compare_names(&a.place.name, &b.place.name)),
    }

    Ok(picked)
}

/// Filter an already ranked list down to one category, keeping rank order
pub fn hot_spots_for_category(ranked: Vec<RankedPlace>, category: &str) -> Vec<RankedPlace> {
    ranked
        .into_iter()
        .filter(|r| r.place.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Post;
    use crate::rank::rank_places;

    fn sample_places() -> Vec<Place> {
        vec![
            Place::new("1", "Mellow Cafe").with_category("cafe").with_location(37.60, 127.10),
            Place::new("2", "Pop Seongsu").with_category("popup_store").with_location(37.5445, 127.056),
            Place::new("3", "bean house").with_category("cafe"),
            Place::new("4", "Arabica").with_category("cafe").with_location(37.545, 127.055),
            Place::new("5", "Anchor Cafe").with_category("cafe"),
        ]
    }

    fn names(ranked: &[RankedPlace]) -> Vec<&str> {
        ranked.iter().map(|r| r.place.name.as_str()).collect()
    }

    #[test]
    fn test_picker_without_viewer_is_alphabetical() {
        let picked = places_for_category(&sample_places(), "cafe", None).unwrap();
        assert_eq!(names(&picked), vec!["Anchor Cafe", "Arabica", "bean house", "Mellow Cafe"]);
        assert!(picked.iter().all(|r| r.distance_km().is_none()));
    }

    #[test]
    fn test_picker_with_viewer_is_nearest_first() {
        let viewer = GeoPoint::new(37.544, 127.055);
        let picked = places_for_category(&sample_places(), "cafe", Some(viewer)).unwrap();

        assert_eq!(names(&picked), vec!["Arabica", "Mellow Cafe", "Anchor Cafe", "bean house"]);
        assert!(picked[0].distance_km().unwrap() < picked[1].distance_km().unwrap());
    }

    #[test]
    fn test_picker_other_category_is_empty() {
        let places = vec![Place::new("1", "Somewhere")];
        assert!(places_for_category(&places, DEFAULT_CATEGORY, None).unwrap().is_empty());
        assert!(places_for_category(&places, "", None).unwrap().is_empty());
    }

    #[test]
    fn test_picker_rejects_invalid_viewer() {
        let viewer = GeoPoint::new(f64::NAN, 0.0);
        assert!(places_for_category(&sample_places(), "cafe", Some(viewer)).is_err());
    }

    #[test]
    fn test_hot_spots_keep_rank_order() {
        let posts = vec![
            Post::new("1").with_place_name("Mellow Cafe"),
            Post::new("2").with_place_name("Mellow Cafe"),
            Post::new("3").with_place_name("Pop Seongsu"),
            Post::new("4").with_place_name("Pop Seongsu"),
            Post::new("5").with_place_name("Pop Seongsu"),
            Post::new("6").with_place_name("Arabica"),
        ];
        let ranked = rank_places(&sample_places(), &posts, None).unwrap();

        let cafes = hot_spots_for_category(ranked, "cafe");
        assert_eq!(names(&cafes), vec!["Mellow Cafe", "Arabica", "Anchor Cafe", "bean house"]);
    }
}
