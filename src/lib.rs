//! Item vendor lookup
//!
//! Walks a static game-data export once, resolving every NPC's shop records
//! into an item-keyed index of vendors, costs and world locations.

pub mod config;
pub mod data;
pub mod location;
pub mod lookup;
pub mod model;
pub mod vendor;

#[cfg(test)]
mod fixtures;

pub use config::ServerConfig;
pub use data::{LayerSource, MemoryLayers, MemoryRepository, RecordRepository, RepositoryError};
pub use lookup::{BuildOptions, BuildState, VendorIndex, VendorLookup};
pub use model::{Cost, ItemInfo, ItemType, NpcInfo, NpcLocation, TerritoryRef};
