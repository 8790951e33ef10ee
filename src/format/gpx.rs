//! GPX output formatter

use crate::cluster::MapItem;
use crate::config::Config;
use crate::error::Result;
use crate::format::{marker_name, OutputFormatter, Report};
use crate::geo::distance::format_distance;
use crate::geo::GeoPoint;
use crate::rank::Ranking;

/// GPX formatter - outputs located places or map markers as waypoints
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, report: &Report<'_>, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="spotvibe">"#);
        gpx.push('\n');

        match report {
            Report::Ranking { places, .. } => {
                push_metadata(&mut gpx, "spotvibe hot spots");
                // Waypoints need a position; location-less places are left out
                for (i, ranked) in places.iter().enumerate() {
                    let Some(location) = ranked.place.location else {
                        continue;
                    };
                    let desc = match &ranked.ranking {
                        Ranking::Distance { distance_km: Some(km) } => format_distance(*km),
                        Ranking::Distance { distance_km: None } => String::new(),
                        Ranking::Popularity { post_count, .. } => format!("{} posts", post_count),
                    };
                    let name = format!("{}. {}", i + 1, ranked.place.name);
                    push_waypoint(&mut gpx, location, &name, &desc, &ranked.place.category);
                }
            }
            Report::Map { items } => {
                push_metadata(&mut gpx, "spotvibe map");
                for item in items.iter() {
                    let (desc, symbol) = match item {
                        MapItem::Cluster(marker) => {
                            (format!("{} posts", marker.cluster.len()), "Flag")
                        }
                        MapItem::Pin(pin) => (
                            pin.post.vibe.map(|v| v.label().to_string()).unwrap_or_default(),
                            "Pin",
                        ),
                    };
                    push_waypoint(&mut gpx, item.position(), &marker_name(item), &desc, symbol);
                }
            }
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

fn push_metadata(gpx: &mut String, name: &str) {
    gpx.push_str("  <metadata>\n");
    gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(name)));
    gpx.push_str(&format!("    <time>{}</time>\n", chrono::Utc::now().to_rfc3339()));
    gpx.push_str("  </metadata>\n");
}

fn push_waypoint(gpx: &mut String, at: GeoPoint, name: &str, desc: &str, symbol: &str) {
    gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, at.lat, at.lng));
    gpx.push('\n');
    gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(name)));
    if !desc.is_empty() {
        gpx.push_str(&format!("    <desc>{}</desc>\n", escape_xml(desc)));
    }
    gpx.push_str(&format!("    <sym>{}</sym>\n", escape_xml(symbol)));
    gpx.push_str("  </wpt>\n");
}

/// Escape text for XML element content
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;
    use crate::rank::RankMode;

    #[test]
    fn test_gpx_ranking() {
        let places = fixtures::distance_ranking();
        let report = Report::Ranking {
            mode: RankMode::Distance,
            places: &places,
        };

        let output = GpxFormatter.format(&report, &Config::default()).unwrap();

        assert!(output.contains(r#"<?xml version="1.0""#));
        assert!(output.contains(r#"<gpx version="1.1" creator="spotvibe">"#));
        assert!(output.contains(r#"<wpt lat="37.5445" lon="127.056">"#));
        assert!(output.contains("<name>1. Pop Seongsu</name>"));
        assert!(output.contains("<name>2. Cafe &amp; Bakery</name>"));
        // Hidden Bar has no location
        assert!(!output.contains("Hidden Bar"));
        assert_eq!(output.matches("<wpt").count(), 2);
        assert!(output.ends_with("</gpx>\n"));
    }

    #[test]
    fn test_gpx_map() {
        let items = fixtures::map_items();
        let report = Report::Map { items: &items };

        let output = GpxFormatter.format(&report, &Config::default()).unwrap();

        assert_eq!(output.matches("<wpt").count(), 2);
        assert!(output.contains("<desc>2 posts</desc>"));
        assert!(output.contains("<sym>Flag</sym>"));
        assert!(output.contains("<desc>Quiet</desc>"));
        assert!(output.contains("<sym>Pin</sym>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_gpx_formatter_info() {
        assert_eq!(GpxFormatter.name(), "gpx");
        assert!(!GpxFormatter.description().is_empty());
    }
}
