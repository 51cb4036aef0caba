mod filtered_leg;
pub(crate) mod leg;
mod node;
mod settings;
mod sla;

pub use filtered_leg::FilteredLeg;
pub use leg::{ConnectionLeg, Mode};
pub use node::{DuplicateNodeError, Node, NodeTable, UnknownNodeError};
pub use settings::{CurveSettings, ExplorerSettings, MapSettings, RiskWeights, SettingsError};
pub use sla::{SlaColor, SlaSet, SlaStatus, UnknownSlaColor};
