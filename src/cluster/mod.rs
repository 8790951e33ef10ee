//! Map clustering
//!
//! Groups posts taken within ~100 m of each other into one map marker.
//! Every call reclusters from scratch; nothing is cached between calls.
//!
//! ## Algorithm
//!
//! Posts are visited in input order. Each unassigned post seeds a new
//! cluster, and every other unassigned post closer than the threshold to
//! that **seed** (not to the running centroid) joins it. The centroid is the
//! mean of the members and is recomputed after each join. Distances are
//! plain Euclidean distances in degree space.

use crate::constants::geo::CLUSTER_THRESHOLD_DEG;
use crate::error::{Error, Result};
use crate::geo::distance::planar_distance_deg;
use crate::geo::GeoPoint;
use crate::model::Post;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A group of nearby posts from a single clustering run
///
/// Ids are only meaningful within the run that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    /// Members in join order; the seed is first
    pub members: Vec<Post>,
    pub centroid: GeoPoint,
}

impl Cluster {
    fn seeded(id: String, seed: Post, location: GeoPoint) -> Self {
        Self {
            id,
            members: vec![seed],
            centroid: location,
        }
    }

    fn push(&mut self, post: Post) {
        self.members.push(post);
        if let Some(centroid) = GeoPoint::mean(self.members.iter().filter_map(|p| p.location.as_ref())) {
            self.centroid = centroid;
        }
    }

    /// The member whose photo and vibe represent the cluster
    pub fn representative(&self) -> Option<&Post> {
        self.members.first()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A single post marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub post: Post,
    /// Main photo of the post
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub position: GeoPoint,
    /// The expanded cluster this pin came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
}

impl Pin {
    fn new(post: Post, position: GeoPoint, cluster_id: Option<String>) -> Self {
        Self {
            image: post.main_image().map(str::to_string),
            post,
            position,
            cluster_id,
        }
    }
}

/// A multi-post marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMarker {
    pub cluster: Cluster,
    /// Main photo of the first member
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One marker on the map: a lone post or a group of posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapItem {
    Pin(Pin),
    Cluster(ClusterMarker),
}

impl MapItem {
    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    /// Number of posts behind this marker
    pub fn count(&self) -> usize {
        match self {
            Self::Pin(_) => 1,
            Self::Cluster(marker) => marker.cluster.len(),
        }
    }

    /// Where the marker is drawn: the post location or the cluster centroid
    pub fn position(&self) -> GeoPoint {
        match self {
            Self::Pin(pin) => pin.position,
            Self::Cluster(marker) => marker.cluster.centroid,
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Pin(pin) => pin.image.as_deref(),
            Self::Cluster(marker) => marker.image.as_deref(),
        }
    }

    /// Post whose attributes are displayed on the marker
    pub fn representative(&self) -> Option<&Post> {
        match self {
            Self::Pin(pin) => Some(&pin.post),
            Self::Cluster(marker) => marker.cluster.representative(),
        }
    }

    pub fn as_cluster(&self) -> Option<&Cluster> {
        match self {
            Self::Pin(_) => None,
            Self::Cluster(marker) => Some(&marker.cluster),
        }
    }

    /// Every post behind this marker
    pub fn posts(&self) -> Vec<&Post> {
        match self {
            Self::Pin(pin) => vec![&pin.post],
            Self::Cluster(marker) => marker.cluster.members.iter().collect(),
        }
    }
}

/// What the map is currently showing
#[derive(Debug, Clone, Copy)]
pub enum ClusterMode<'a> {
    /// All posts, grouped
    Overview,
    /// The members of one previously produced cluster
    Expanded(&'a Cluster),
}

/// Map clusterer with a configurable join radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clusterer {
    threshold_deg: f64,
}

impl Default for Clusterer {
    fn default() -> Self {
        Self {
            threshold_deg: CLUSTER_THRESHOLD_DEG,
        }
    }
}

impl Clusterer {
    /// Create a clusterer with a join radius in degrees
    pub fn new(threshold_deg: f64) -> Result<Self> {
        if !threshold_deg.is_finite() || threshold_deg <= 0.0 {
            return Err(Error::InvalidThreshold(format!(
                "Threshold must be a positive number of degrees, got {}",
                threshold_deg
            )));
        }
        Ok(Self { threshold_deg })
    }

    pub fn threshold_deg(&self) -> f64 {
        self.threshold_deg
    }

    /// Produce map markers for the given mode
    pub fn cluster(&self, posts: &[Post], mode: ClusterMode<'_>) -> Vec<MapItem> {
        match mode {
            ClusterMode::Expanded(cluster) => expand(cluster),
            ClusterMode::Overview => self
                .build_clusters(posts)
                .into_iter()
                .map(into_map_item)
                .collect(),
        }
    }

    /// Group located posts into clusters
    ///
    /// Posts without a location, or with an invalid one, are left out.
    pub fn build_clusters(&self, posts: &[Post]) -> Vec<Cluster> {
        let located: Vec<(&Post, GeoPoint)> = posts
            .iter()
            .filter_map(|post| {
                let location = post.location?;
                if !location.is_valid() {
                    warn!(post_id = %post.id, %location, "Leaving post off the map: invalid location");
                    return None;
                }
                Some((post, location))
            })
            .collect();

        let mut assigned = vec![false; located.len()];
        let mut clusters = Vec::new();

        for (index, &(seed, seed_location)) in located.iter().enumerate() {
            if assigned[index] {
                continue;
            }
            assigned[index] = true;

            let mut cluster = Cluster::seeded(format!("cluster-{}", index), seed.clone(), seed_location);

            for (other, &(candidate, location)) in located.iter().enumerate() {
                if assigned[other] {
                    continue;
                }
                if planar_distance_deg(seed_location, location) < self.threshold_deg {
                    cluster.push(candidate.clone());
                    assigned[other] = true;
                }
            }

            clusters.push(cluster);
        }

        debug!(
            posts = posts.len(),
            located = located.len(),
            clusters = clusters.len(),
            "Clustered posts"
        );
        clusters
    }
}

/// Cluster posts with the default ~100 m join radius
pub fn cluster_posts(posts: &[Post], mode: ClusterMode<'_>) -> Vec<MapItem> {
    Clusterer::default().cluster(posts, mode)
}

/// Find a cluster by id among map items
pub fn find_cluster<'a>(items: &'a [MapItem], id: &str) -> Option<&'a Cluster> {
    items
        .iter()
        .filter_map(MapItem::as_cluster)
        .find(|cluster| cluster.id == id)
}

fn into_map_item(mut cluster: Cluster) -> MapItem {
    if cluster.len() == 1 {
        let position = cluster.centroid;
        let post = cluster.members.remove(0);
        return MapItem::Pin(Pin::new(post, position, None));
    }

    let image = cluster
        .representative()
        .and_then(Post::main_image)
        .map(str::to_string);
    MapItem::Cluster(ClusterMarker { cluster, image })
}

fn expand(cluster: &Cluster) -> Vec<MapItem> {
    cluster
        .members
        .iter()
        .map(|post| {
            let position = post.location.unwrap_or(cluster.centroid);
            MapItem::Pin(Pin::new(post.clone(), position, Some(cluster.id.clone())))
        })
        .collect()
}
