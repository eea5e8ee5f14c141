//! Game Data Loader
//!
//! Loads a game-data export directory:
//!
//! ```text
//! <data_dir>/sheets/<Sheet>.json          JSON array of rows
//! <data_dir>/layers/<game path>.json      one decoded layer file each
//! ```

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::layer::{LayerFile, MemoryLayers};
use super::repository::MemoryRepository;
use super::sheets::*;

/// A fully loaded export: sheets plus scene layers
pub struct GameData {
    pub records: MemoryRepository,
    pub layers: MemoryLayers,
}

impl GameData {
    /// Load every sheet and layer file from an export directory.
    ///
    /// The record repository is marked ready once everything has loaded.
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, String> {
        let sheets_dir = data_dir.join("sheets");
        if !sheets_dir.exists() {
            warn!("Sheets directory does not exist: {:?}", sheets_dir);
        }

        let mut records = MemoryRepository::new();
        load_rows::<Item>(&mut records, &sheets_dir)?;
        load_rows::<Addon>(&mut records, &sheets_dir)?;
        load_rows::<Achievement>(&mut records, &sheets_dir)?;
        load_rows::<ENpcBase>(&mut records, &sheets_dir)?;
        load_rows::<ENpcResident>(&mut records, &sheets_dir)?;
        load_rows::<GilShop>(&mut records, &sheets_dir)?;
        load_subrows::<GilShopItem>(&mut records, &sheets_dir)?;
        load_rows::<SpecialShop>(&mut records, &sheets_dir)?;
        load_rows::<GcShop>(&mut records, &sheets_dir)?;
        load_rows::<GrandCompany>(&mut records, &sheets_dir)?;
        load_rows::<GcScripShopCategory>(&mut records, &sheets_dir)?;
        load_subrows::<GcScripShopItem>(&mut records, &sheets_dir)?;
        load_rows::<InclusionShop>(&mut records, &sheets_dir)?;
        load_rows::<InclusionShopCategory>(&mut records, &sheets_dir)?;
        load_subrows::<InclusionShopSeries>(&mut records, &sheets_dir)?;
        load_rows::<FccShop>(&mut records, &sheets_dir)?;
        load_rows::<FateShop>(&mut records, &sheets_dir)?;
        load_rows::<PreHandler>(&mut records, &sheets_dir)?;
        load_rows::<TopicSelect>(&mut records, &sheets_dir)?;
        load_rows::<CustomTalk>(&mut records, &sheets_dir)?;
        load_subrows::<CustomTalkNestHandlers>(&mut records, &sheets_dir)?;
        load_rows::<TerritoryType>(&mut records, &sheets_dir)?;
        load_rows::<Level>(&mut records, &sheets_dir)?;

        let layers = load_layers(&data_dir.join("layers"))?;

        records.set_ready(true);
        Ok(Self { records, layers })
    }
}

fn read_sheet<T: Sheet>(dir: &Path) -> Result<Vec<T>, String> {
    let path = dir.join(format!("{}.json", T::NAME));
    if !path.exists() {
        warn!("Sheet file does not exist: {:?}", path);
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))
}

fn load_rows<T: Sheet>(records: &mut MemoryRepository, dir: &Path) -> Result<(), String> {
    let rows = read_sheet::<T>(dir)?;
    info!("Loaded {} rows from sheet {}", rows.len(), T::NAME);
    records.extend(rows);
    Ok(())
}

fn load_subrows<T: SubrowSheet>(records: &mut MemoryRepository, dir: &Path) -> Result<(), String> {
    let rows = read_sheet::<T>(dir)?;
    info!("Loaded {} sub-rows from sheet {}", rows.len(), T::NAME);
    records.extend_subrows(rows);
    Ok(())
}

/// Load every layer file under a directory, keyed by its game path
fn load_layers(dir: &Path) -> Result<MemoryLayers, String> {
    let mut layers = MemoryLayers::new();

    if !dir.exists() {
        warn!("Layers directory does not exist: {:?}", dir);
        return Ok(layers);
    }

    let mut paths = Vec::new();
    collect_json_files(dir, &mut paths)?;

    for path in paths {
        let Some(game_path) = game_path(dir, &path) else {
            continue;
        };

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<LayerFile>(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(file) => layers.insert(&game_path, file),
            Err(e) => warn!("Failed to load layer file {:?}: {}", path, e),
        }
    }

    info!("Loaded {} layer files", layers.len());
    Ok(layers)
}

fn collect_json_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {:?}: {}", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_json_files(&path, paths)?;
        } else if path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        }
    }

    Ok(())
}

/// `<root>/bg/a/level/planevent.lgb.json` -> `bg/a/level/planevent.lgb`
fn game_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
