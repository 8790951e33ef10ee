//! spotvibe: map clustering and hot-spot ranking for venue posts
//!
//! A library and CLI tool that turns geotagged photo posts and venue records
//! into map markers and "Hot Spots Now" lists.
//!
//! ## Features
//!
//! - Haversine distances with validated coordinates
//! - Seed-based clustering of nearby posts (~100 m) into map markers
//! - Expanding one cluster into its individual posts
//! - Nearest-first ranking with a popularity fallback
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use spotvibe::cluster::{cluster_posts, ClusterMode};
//! use spotvibe::model::{Place, Post};
//! use spotvibe::rank::rank_places;
//! use spotvibe::GeoPoint;
//!
//! let posts = vec![
//!     Post::new("a").with_place_name("A").with_location(37.5440, 127.0550),
//!     Post::new("b").with_place_name("B").with_location(37.5500, 127.0600),
//!     Post::new("c").with_place_name("A").with_location(37.5441, 127.0551),
//! ];
//!
//! // One two-post cluster for "A" and a lone pin for "B"
//! let items = cluster_posts(&posts, ClusterMode::Overview);
//! assert_eq!(items.len(), 2);
//!
//! // Nearest place first
//! let places = vec![
//!     Place::new("1", "B").with_location(37.5500, 127.0600),
//!     Place::new("2", "A").with_location(37.5440, 127.0550),
//! ];
//! let ranked = rank_places(&places, &posts, Some(GeoPoint::new(37.544, 127.055))).unwrap();
//! assert_eq!(ranked[0].place.name, "A");
//! ```

pub mod cli;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod format;
pub mod geo;
pub mod model;
pub mod rank;
pub mod server;

// Re-export commonly used types
pub use cluster::{Cluster, ClusterMode, Clusterer, MapItem};
pub use config::Config;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use geo::GeoPoint;
pub use model::{Place, Post, Vibe};
pub use rank::{RankMode, RankedPlace};
