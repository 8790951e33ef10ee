//! URL output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{marker_name, OutputFormatter, Report};

/// URL formatter - outputs one map link per located place or marker
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URLs with an optional provider override
    pub fn format_with_provider(
        &self,
        report: &Report<'_>,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let mut lines = Vec::new();

        match report {
            Report::Ranking { places, .. } => {
                for ranked in places.iter() {
                    if let Some(location) = ranked.place.location {
                        let url = config.format_url(provider, location, &ranked.place.name)?;
                        lines.push(format!("{}\t{}", ranked.place.name, url));
                    }
                }
            }
            Report::Map { items } => {
                for item in items.iter() {
                    let name = marker_name(item);
                    let url = config.format_url(provider, item.position(), &name)?;
                    lines.push(format!("{}\t{}", name, url));
                }
            }
        }

        Ok(lines.join("\n"))
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map links for each place or marker"
    }

    fn format(&self, report: &Report<'_>, config: &Config) -> Result<String> {
        self.format_with_provider(report, config, None)
    }
}
