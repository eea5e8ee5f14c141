//! Location Corrections
//!
//! Hand-verified NPC positions applied after the scene-layer and spawn-point
//! passes. A built-in table is compiled in; a TOML file may replace it.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

const BUILTIN_CORRECTIONS: &str = include_str!("../../data/location_corrections.toml");

/// Move already-located NPCs to another territory, keeping coordinates
#[derive(Debug, Clone, Deserialize)]
pub struct TerritoryFix {
    pub territory: u32,
    pub npcs: Vec<u32>,
}

/// An exact position for one NPC
#[derive(Debug, Clone, Deserialize)]
pub struct Correction {
    pub npc: u32,
    pub x: f32,
    pub z: f32,
    pub territory: u32,
    #[serde(default)]
    pub map_scale: Option<u16>,
}

/// One shared position for many NPCs
#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionGroup {
    pub npcs: Vec<u32>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub z: f32,
    pub territory: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationCorrections {
    #[serde(default)]
    pub territory_fix: Option<TerritoryFix>,
    /// Applied unconditionally, in order
    #[serde(default)]
    pub replace: Vec<Correction>,
    /// Applied only to NPCs with no location yet
    #[serde(default)]
    pub insert: Vec<Correction>,
    #[serde(default)]
    pub insert_group: Vec<CorrectionGroup>,
}

impl LocationCorrections {
    /// The compiled-in correction table
    pub fn builtin() -> Result<Self, String> {
        toml::from_str(BUILTIN_CORRECTIONS).map_err(|e| format!("Failed to parse built-in corrections: {}", e))
    }

    /// Load a correction table from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let corrections: Self =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        info!("Loaded {} location corrections from {:?}", corrections.len(), path);
        Ok(corrections)
    }

    /// Number of NPC positions the table sets
    pub fn len(&self) -> usize {
        self.replace.len()
            + self.insert.len()
            + self.insert_group.iter().map(|group| group.npcs.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
