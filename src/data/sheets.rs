//! Sheet Row Structures
//!
//! Typed rows of the game-data sheets the vendor build reads. Field names
//! follow the JSON export; rows deserialize with defaults for anything the
//! export leaves out.

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A sheet whose rows are addressed by row id
pub trait Sheet: DeserializeOwned + Send + Sync + 'static {
    /// Sheet name, also the export file stem
    const NAME: &'static str;

    fn row_id(&self) -> u32;
}

/// A sheet whose rows are addressed by (group row id, sub-row index)
pub trait SubrowSheet: Sheet {
    fn sub_row_id(&self) -> u32;
}

macro_rules! sheet {
    ($ty:ident) => {
        impl Sheet for $ty {
            const NAME: &'static str = stringify!($ty);

            fn row_id(&self) -> u32 {
                self.row_id
            }
        }
    };
    ($ty:ident, subrows) => {
        sheet!($ty);

        impl SubrowSheet for $ty {
            fn sub_row_id(&self) -> u32 {
                self.sub_row_id
            }
        }
    };
}

// ============================================================================
// Items and Text
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    pub row_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_mid: u32,
}
sheet!(Item);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Addon {
    pub row_id: u32,
    #[serde(default)]
    pub text: String,
}
sheet!(Addon);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Achievement {
    pub row_id: u32,
    #[serde(default)]
    pub item: u32,
    #[serde(default)]
    pub description: String,
}
sheet!(Achievement);

// ============================================================================
// NPCs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ENpcBase {
    pub row_id: u32,
    /// Raw event handler values; the upper 16 bits select the handler type
    #[serde(default)]
    pub npc_data: Vec<u32>,
}
sheet!(ENpcBase);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ENpcResident {
    pub row_id: u32,
    #[serde(default)]
    pub singular: String,
}
sheet!(ENpcResident);

// ============================================================================
// Shops
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GilShop {
    pub row_id: u32,
    #[serde(default)]
    pub name: String,
}
sheet!(GilShop);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GilShopItem {
    pub row_id: u32,
    pub sub_row_id: u32,
    #[serde(default)]
    pub item: u32,
}
sheet!(GilShopItem, subrows);

/// An item and a quantity, on either side of a barter
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ItemCount {
    pub item: u32,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialShopEntry {
    pub costs: Option<Vec<ItemCount>>,
    pub results: Option<Vec<ItemCount>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialShop {
    pub row_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<SpecialShopEntry>,
}
sheet!(SpecialShop);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GcShop {
    pub row_id: u32,
    #[serde(default)]
    pub grand_company: u32,
}
sheet!(GcShop);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrandCompany {
    pub row_id: u32,
    #[serde(default)]
    pub name: String,
}
sheet!(GrandCompany);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GcScripShopCategory {
    pub row_id: u32,
    #[serde(default)]
    pub grand_company: u32,
}
sheet!(GcScripShopCategory);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GcScripShopItem {
    pub row_id: u32,
    pub sub_row_id: u32,
    #[serde(default)]
    pub item: u32,
    #[serde(default)]
    pub cost_gc_seals: u32,
    /// Zero marks the end of a category's list
    #[serde(default)]
    pub sort_key: u32,
}
sheet!(GcScripShopItem, subrows);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InclusionShop {
    pub row_id: u32,
    #[serde(default)]
    pub categories: Vec<u32>,
}
sheet!(InclusionShop);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InclusionShopCategory {
    pub row_id: u32,
    #[serde(default)]
    pub name: String,
    /// Group id of this category's InclusionShopSeries rows
    #[serde(default)]
    pub series: u32,
}
sheet!(InclusionShopCategory);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InclusionShopSeries {
    pub row_id: u32,
    pub sub_row_id: u32,
    #[serde(default)]
    pub special_shop: u32,
}
sheet!(InclusionShopSeries, subrows);

/// Free company credit shop. `items` and `costs` are parallel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FccShop {
    pub row_id: u32,
    #[serde(default)]
    pub items: Vec<u32>,
    #[serde(default)]
    pub costs: Vec<u32>,
}
sheet!(FccShop);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FateShop {
    pub row_id: u32,
    #[serde(default)]
    pub special_shops: Vec<u32>,
}
sheet!(FateShop);

// ============================================================================
// Dialogue Indirection
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreHandler {
    pub row_id: u32,
    #[serde(default)]
    pub target: u32,
}
sheet!(PreHandler);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicSelect {
    pub row_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shops: Vec<u32>,
}
sheet!(TopicSelect);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomTalk {
    pub row_id: u32,
    /// Group id of this talk's CustomTalkNestHandlers rows, zero when unused
    #[serde(default)]
    pub special_links: u32,
    #[serde(default)]
    pub script_args: Vec<u32>,
}
sheet!(CustomTalk);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomTalkNestHandlers {
    pub row_id: u32,
    pub sub_row_id: u32,
    #[serde(default)]
    pub nest_handler: u32,
}
sheet!(CustomTalkNestHandlers, subrows);

// ============================================================================
// World
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TerritoryType {
    pub row_id: u32,
    /// Background scene path, e.g. `ffxiv/sea_s1/twn/s1t1/level/s1t1`
    #[serde(default)]
    pub bg: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub map: u32,
}
sheet!(TerritoryType);

/// A generic placed object (spawn point, marker, NPC position)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Level {
    pub row_id: u32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(rename = "type", default)]
    pub kind: u8,
    /// Row id of the placed object; an ENpcBase id for NPC spawns
    #[serde(default)]
    pub object: u32,
    #[serde(default)]
    pub territory: u32,
}
sheet!(Level);
