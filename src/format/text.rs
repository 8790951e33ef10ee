//! Human-readable text output formatter

use crate::cluster::MapItem;
use crate::config::Config;
use crate::error::Result;
use crate::format::{marker_name, OutputFormatter, Report};
use crate::geo::distance::format_distance;
use crate::model::time_ago;
use crate::rank::{RankMode, RankedPlace, Ranking};
use chrono::{DateTime, Utc};

/// Text formatter - outputs a human-readable list
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &Report<'_>, _config: &Config) -> Result<String> {
        let now = Utc::now();
        Ok(match report {
            Report::Ranking { mode, places } => render_ranking(*mode, places, now),
            Report::Map { items } => render_map(items, now),
        })
    }
}

fn render_ranking(mode: RankMode, places: &[RankedPlace], now: DateTime<Utc>) -> String {
    let mut output = String::new();

    let heading = match mode {
        RankMode::Distance => "Hot Spots Now (nearest first)",
        RankMode::Popularity => "Hot Spots Now (most posted first)",
    };
    output.push_str(heading);
    output.push('\n');

    if places.is_empty() {
        output.push_str("  No places\n");
        return output;
    }

    for (i, ranked) in places.iter().enumerate() {
        let detail = match &ranked.ranking {
            Ranking::Distance { distance_km: Some(km) } => format_distance(*km),
            Ranking::Distance { distance_km: None } => "distance unknown".to_string(),
            Ranking::Popularity {
                post_count,
                latest_post_time,
            } => {
                let noun = if *post_count == 1 { "post" } else { "posts" };
                match latest_post_time {
                    Some(latest) => {
                        format!("{} {}, latest {}", post_count, noun, time_ago(*latest, now))
                    }
                    None => format!("{} {}", post_count, noun),
                }
            }
        };

        output.push_str(&format!(
            "{:>3}. {} [{}] - {}\n",
            i + 1,
            ranked.place.name,
            ranked.place.category,
            detail
        ));
    }

    output
}

fn render_map(items: &[MapItem], now: DateTime<Utc>) -> String {
    let mut output = String::new();

    let posts: usize = items.iter().map(MapItem::count).sum();
    output.push_str(&format!("Map: {} markers, {} posts\n", items.len(), posts));

    for item in items {
        let vibe = item
            .representative()
            .and_then(|post| post.vibe)
            .map(|v| format!(" {}", v))
            .unwrap_or_default();
        let recent = if item.posts().iter().any(|post| post.is_recent(now)) {
            " (recent)"
        } else {
            ""
        };

        match item {
            MapItem::Cluster(marker) => output.push_str(&format!(
                "  {} {}: {} posts at {}{}{}\n",
                marker.cluster.id,
                marker_name(item),
                marker.cluster.len(),
                marker.cluster.centroid,
                vibe,
                recent
            )),
            MapItem::Pin(pin) => output.push_str(&format!(
                "  pin {}: {} at {}{}{}\n",
                pin.post.id,
                marker_name(item),
                pin.position,
                vibe,
                recent
            )),
        }
    }

    output
}
