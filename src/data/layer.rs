//! Scene Layer Files
//!
//! Decoded scene-graph layer files: groups of placed instance objects.

use serde::Deserialize;
use std::collections::HashMap;

/// Kind of a placed instance object. Only event NPCs matter to the vendor build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerEntryType {
    EventNpc,
    BattleNpc,
    EventObject,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceObject {
    pub asset_type: LayerEntryType,
    /// Backing ENpcBase row id for event NPC instances
    #[serde(default)]
    pub base_id: u32,
    #[serde(default)]
    pub translation: Vec3,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instance_objects: Vec<InstanceObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerFile {
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl LayerFile {
    /// Iterate every instance object across all layers
    pub fn instance_objects(&self) -> impl Iterator<Item = &InstanceObject> {
        self.layers.iter().flat_map(|layer| layer.instance_objects.iter())
    }
}

/// Scene-layer decoder
pub trait LayerSource: Send + Sync {
    /// Load a layer file by its game path (e.g. `bg/.../level/planevent.lgb`)
    fn load_layer_file(&self, path: &str) -> Option<LayerFile>;
}

/// Layer files held in memory, keyed by game path
#[derive(Debug, Default)]
pub struct MemoryLayers {
    files: HashMap<String, LayerFile>,
}

impl MemoryLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, file: LayerFile) {
        self.files.insert(path.to_string(), file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl LayerSource for MemoryLayers {
    fn load_layer_file(&self, path: &str) -> Option<LayerFile> {
        self.files.get(path).cloned()
    }
}
