//! Crowd-level tags attached to posts

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// How crowded a venue was when the photo was posted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vibe {
    #[serde(rename = "verybusy")]
    VeryBusy,
    #[serde(rename = "busy")]
    Busy,
    #[serde(rename = "nowait")]
    NoWait,
    #[serde(rename = "quiet")]
    Quiet,
    #[serde(rename = "soldout")]
    SoldOut,
}

/// Display metadata for a vibe option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibeInfo {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub description: String,
}

impl Vibe {
    /// Stable identifier used in stored records
    pub fn id(&self) -> &'static str {
        match self {
            Self::VeryBusy => "verybusy",
            Self::Busy => "busy",
            Self::NoWait => "nowait",
            Self::Quiet => "quiet",
            Self::SoldOut => "soldout",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryBusy => "Very Busy",
            Self::Busy => "Busy",
            Self::NoWait => "No Wait",
            Self::Quiet => "Quiet",
            Self::SoldOut => "Sold Out / Closed",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::VeryBusy => "🔥",
            Self::Busy => "⏱️",
            Self::NoWait => "✅",
            Self::Quiet => "🟢",
            Self::SoldOut => "⚠️",
        }
    }

    /// Expected wait, as shown under the label
    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryBusy => "40min+",
            Self::Busy => "10-20min",
            Self::NoWait => "No Wait",
            Self::Quiet => "Quiet",
            Self::SoldOut => "Closed",
        }
    }

    pub fn info(&self) -> VibeInfo {
        VibeInfo {
            id: self.id().to_string(),
            label: self.label().to_string(),
            emoji: self.emoji().to_string(),
            description: self.description().to_string(),
        }
    }
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

impl std::str::FromStr for Vibe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "verybusy" => Ok(Self::VeryBusy),
            "busy" => Ok(Self::Busy),
            "nowait" => Ok(Self::NoWait),
            "quiet" => Ok(Self::Quiet),
            "soldout" | "closed" => Ok(Self::SoldOut),
            _ => Err(format!("Unknown vibe: {}", s)),
        }
    }
}

/// Read a stored vibe, dropping values that are not a known vibe
///
/// Accepts the same spellings as `FromStr`. Anything else becomes `None`
/// so one odd record cannot fail a whole batch.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Vibe>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => match s.parse() {
            Ok(vibe) => Some(vibe),
            Err(e) => {
                warn!("Ignoring vibe: {}", e);
                None
            }
        },
        Some(other) => {
            warn!("Ignoring vibe: {} is not a string", other);
            None
        }
    })
}

/// List all vibe options in display order
pub fn available_vibes() -> Vec<Vibe> {
    vec![
        Vibe::VeryBusy,
        Vibe::Busy,
        Vibe::NoWait,
        Vibe::Quiet,
        Vibe::SoldOut,
    ]
}
