use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque path-style identifier for a resource on the bridge
/// (e.g. `/area/3`, `/zone/7/status`).
///
/// Hrefs recorded on tree nodes are always the canonical form returned
/// by the bridge, never the possibly-relative form used to request them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Href(String);

impl Href {
    /// Create an href from a path string
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The href as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address a sub-resource of this href
    pub(crate) fn join(&self, tail: &str) -> Href {
        Href(format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            tail.trim_start_matches('/')
        ))
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Href {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for Href {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Control capability of a zone, as reported by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlType {
    /// On/off load
    Switched,

    /// Dimmable load
    Dimmed,

    /// Colour-tunable load
    SpectrumTuning,

    /// A tag this library does not classify
    Other(String),
}

impl ControlType {
    /// The tag string as the bridge reports it
    pub fn as_str(&self) -> &str {
        match self {
            ControlType::Switched => "Switched",
            ControlType::Dimmed => "Dimmed",
            ControlType::SpectrumTuning => "SpectrumTuning",
            ControlType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ControlType {
    fn from(tag: &str) -> Self {
        match tag {
            "Switched" => ControlType::Switched,
            "Dimmed" => ControlType::Dimmed,
            "SpectrumTuning" => ControlType::SpectrumTuning,
            other => ControlType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ControlType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ControlType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ControlType::from(tag.as_str()))
    }
}

/// Bare href entry as it appears in summary lists
/// (`AreaSummaries`, `AssociatedZones`)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HrefRef {
    pub href: Href,
}

/// `Body.Area` of an area summary response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AreaSummary {
    pub href: Href,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "AssociatedZones", default)]
    pub associated_zones: Vec<HrefRef>,
}

/// `Body.Zone` of a zone summary response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ZoneSummary {
    pub href: Href,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ControlType")]
    pub control_type: ControlType,
}

/// `Body.ZoneStatus` of a zone status response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ZoneStatus {
    #[serde(rename = "SwitchedLevel", default)]
    pub switched_level: Option<String>,
}
