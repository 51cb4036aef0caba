use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service-level status of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlaColor {
    /// SLA breached
    Red,
    /// At risk
    Orange,
    /// On time
    Green,
}

impl SlaColor {
    pub const ALL: [Self; 3] = [Self::Red, Self::Orange, Self::Green];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Green => "GREEN",
        }
    }

    /// Stroke color used when drawing a leg of this status
    #[must_use]
    pub const fn map_color(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
        }
    }

    #[must_use]
    pub const fn as_flag(self) -> SlaSet {
        match self {
            Self::Red => SlaSet::RED,
            Self::Orange => SlaSet::ORANGE,
            Self::Green => SlaSet::GREEN,
        }
    }
}

impl fmt::Display for SlaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown SLA color '{0}'")]
pub struct UnknownSlaColor(pub String);

impl FromStr for SlaColor {
    type Err = UnknownSlaColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RED" => Ok(Self::Red),
            "ORANGE" => Ok(Self::Orange),
            "GREEN" => Ok(Self::Green),
            _ => Err(UnknownSlaColor(s.to_string())),
        }
    }
}

/// SLA value as read from the legs table
///
/// Values outside the three known colors are kept rather than dropped so
/// that they still count towards totals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SlaStatus {
    Known(SlaColor),
    Unrecognized(String),
}

impl SlaStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<SlaColor>().map_or_else(|_| Self::Unrecognized(raw.trim().to_string()), Self::Known)
    }

    #[must_use]
    pub const fn color(&self) -> Option<SlaColor> {
        match self {
            Self::Known(color) => Some(*color),
            Self::Unrecognized(_) => None,
        }
    }
}

// Same rules as the CSV loader, so "red" and "RED" agree
impl<'de> Deserialize<'de> for SlaStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl From<SlaColor> for SlaStatus {
    fn from(color: SlaColor) -> Self {
        Self::Known(color)
    }
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(color) => fmt::Display::fmt(color, f),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

bitflags::bitflags! {
    /// A selection of SLA colors
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SlaSet: u8 {
        const RED    = 0b0000_0001;
        const ORANGE = 0b0000_0010;
        const GREEN  = 0b0000_0100;
        const ALL    = Self::RED.bits() | Self::ORANGE.bits() | Self::GREEN.bits();
    }
}

impl Default for SlaSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl SlaSet {
    #[must_use]
    pub const fn contains_color(self, color: SlaColor) -> bool {
        self.contains(color.as_flag())
    }

    /// Whether a leg with this status passes the selection.
    /// Unrecognized values never match an explicit color selection.
    #[must_use]
    pub const fn matches(self, status: &SlaStatus) -> bool {
        match status {
            SlaStatus::Known(color) => self.contains_color(*color),
            SlaStatus::Unrecognized(_) => false,
        }
    }

    /// Get a human-readable string representation
    #[must_use]
    pub fn to_display_string(self) -> String {
        if self == Self::ALL {
            return "All".to_string();
        }
        if self.is_empty() {
            return "None".to_string();
        }
        SlaColor::ALL
            .iter()
            .filter(|c| self.contains_color(**c))
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<SlaColor> for SlaSet {
    fn from_iter<I: IntoIterator<Item = SlaColor>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, c| set | c.as_flag())
    }
}

// Serialized as the list of selected color names, e.g. ["RED", "GREEN"]
impl Serialize for SlaSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let colors: Vec<SlaColor> = SlaColor::ALL.into_iter().filter(|c| self.contains_color(*c)).collect();
        let mut seq = serializer.serialize_seq(Some(colors.len()))?;
        for color in colors {
            seq.serialize_element(&color)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SlaSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let colors = Vec::<SlaColor>::deserialize(deserializer)?;
        Ok(colors.into_iter().collect())
    }
}
