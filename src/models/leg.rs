use std::fmt;

use serde::{Deserialize, Serialize};

use super::sla::{SlaColor, SlaStatus};
use crate::time::DepartureTime;

/// Transport mode of a leg ("AIR", "SURFACE", ...)
///
/// Modes are whatever the legs table contains, so they stay an open set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(pub String);

impl Mode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mode {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One directed leg of a connection path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionLeg {
    /// The full named hop sequence this leg belongs to
    pub connection_full_path: String,
    pub origin: String,
    pub dest: String,
    pub departure: DepartureTime,
    pub mode: Mode,
    pub sla: SlaStatus,
    /// Slack in minutes, negative when the connection is already late
    pub buffer_minutes: f64,
}

impl ConnectionLeg {
    #[must_use]
    pub fn sla_color(&self) -> Option<SlaColor> {
        self.sla.color()
    }

    /// Ordered node pair used to group parallel legs
    #[must_use]
    pub fn pair(&self) -> (&str, &str) {
        (&self.origin, &self.dest)
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.origin == self.dest
    }
}
