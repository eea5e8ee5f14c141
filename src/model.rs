//! Lookup Records
//!
//! The aggregated, serializable view of items, vendors and locations.

use serde::{Deserialize, Serialize};

use crate::data::sheets::TerritoryType;

// ============================================================================
// Item Types
// ============================================================================

/// How an item is obtained from its vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    GilShop,
    SpecialShop,
    GcShop,
    FcShop,
    /// Reward for an achievement, bought from an achievement vendor
    Achievement,
}

/// One currency requirement of a sale. Barter shops may list several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub amount: u32,
    pub currency: String,
}

impl Cost {
    pub fn new(amount: u32, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

// ============================================================================
// Locations
// ============================================================================

/// The zone a location's coordinates are relative to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerritoryRef {
    pub id: u32,
    pub place_name: String,
    pub map_id: u32,
}

impl TerritoryRef {
    /// Reference to a territory whose row is not in the dataset
    pub fn bare(id: u32) -> Self {
        Self {
            id,
            place_name: String::new(),
            map_id: 0,
        }
    }
}

impl From<&TerritoryType> for TerritoryRef {
    fn from(territory: &TerritoryType) -> Self {
        Self {
            id: territory.row_id,
            place_name: territory.place_name.clone(),
            map_id: territory.map,
        }
    }
}

/// Where an NPC stands in the world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpcLocation {
    pub x: f32,
    pub z: f32,
    pub territory: TerritoryRef,
    /// Replaces the territory map's own scale when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_scale: Option<u16>,
}

impl NpcLocation {
    pub fn new(x: f32, z: f32, territory: TerritoryRef) -> Self {
        Self {
            x,
            z,
            territory,
            map_scale: None,
        }
    }
}

// ============================================================================
// Aggregated Records
// ============================================================================

/// A vendor selling one particular item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpcInfo {
    pub id: u32,
    pub name: String,
    pub shop_label: Option<String>,
    pub costs: Vec<Cost>,
    pub location: Option<NpcLocation>,
}

/// Everything known about where an item can be bought
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInfo {
    pub id: u32,
    pub name: String,
    pub item_type: ItemType,
    pub achievement_description: String,
    pub vendors: Vec<NpcInfo>,
}

impl ItemInfo {
    /// Get the vendor entry for an NPC
    pub fn vendor(&self, npc_id: u32) -> Option<&NpcInfo> {
        self.vendors.iter().find(|v| v.id == npc_id)
    }
}
