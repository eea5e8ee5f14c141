//! Game Data Access
//!
//! Typed sheets, scene layers, and the repositories serving them.

pub mod error;
pub mod layer;
pub mod loader;
pub mod repository;
pub mod sheets;

pub use error::RepositoryError;
pub use layer::{InstanceObject, Layer, LayerEntryType, LayerFile, LayerSource, MemoryLayers, Vec3};
pub use loader::GameData;
pub use repository::{MemoryRepository, RecordRepository};
pub use sheets::{Sheet, SubrowSheet};
