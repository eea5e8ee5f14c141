//! NPC Locations

pub mod corrections;
pub mod resolver;

pub use corrections::{Correction, CorrectionGroup, LocationCorrections, TerritoryFix};
pub use resolver::{LocationResolver, NPC_SPAWN_LEVEL_TYPE, planevent_path};
