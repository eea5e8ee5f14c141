//! NPC Location Resolver
//!
//! Builds the NPC id -> world position index in four passes. Each pass only
//! fills gaps or explicitly overrides what the earlier passes found:
//!
//! 1. event NPC instances in each territory's scene layers
//! 2. NPC spawn points in the Level sheet
//! 3. territory fixes for NPCs instanced across territories
//! 4. hand-verified position corrections

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, info};

use super::corrections::{Correction, LocationCorrections};
use crate::data::sheets::{Level, TerritoryType};
use crate::data::{LayerEntryType, LayerSource, RecordRepository};
use crate::model::{NpcLocation, TerritoryRef};

/// Level row type of NPC spawn points
pub const NPC_SPAWN_LEVEL_TYPE: u8 = 8;

/// Scene layer file holding a territory's event objects.
///
/// `ffxiv/sea_s1/twn/s1t1/level/s1t1` -> `bg/ffxiv/sea_s1/twn/s1t1/level/planevent.lgb`.
/// `None` when the background path has no `/level/` segment.
pub fn planevent_path(bg: &str) -> Option<String> {
    let level = bg.find("/level/")?;
    Some(format!("bg/{}level/planevent.lgb", &bg[..=level]))
}

pub struct LocationResolver<'r, R, L> {
    repo: &'r R,
    layers: &'r L,
    locations: HashMap<u32, NpcLocation>,
}

impl<'r, R: RecordRepository, L: LayerSource> LocationResolver<'r, R, L> {
    pub fn new(repo: &'r R, layers: &'r L) -> Self {
        Self {
            repo,
            layers,
            locations: HashMap::new(),
        }
    }

    /// Run every pass and hand over the finished index
    pub fn resolve(mut self, corrections: &LocationCorrections) -> HashMap<u32, NpcLocation> {
        let from_layers = self.scene_layer_pass();
        let from_levels = self.spawn_point_pass();
        self.territory_fix_pass(corrections);
        self.correction_pass(corrections);

        info!(
            "Located {} NPCs ({} from scene layers, {} from spawn points)",
            self.locations.len(),
            from_layers,
            from_levels
        );
        self.locations
    }

    /// Pass 1. The first placement seen for an NPC wins.
    pub fn scene_layer_pass(&mut self) -> usize {
        let repo = self.repo;
        let before = self.locations.len();

        for territory in repo.rows::<TerritoryType>() {
            if territory.bg.is_empty() {
                continue;
            }
            let Some(path) = planevent_path(&territory.bg) else {
                debug!("Territory {} has no level path: {}", territory.row_id, territory.bg);
                continue;
            };
            let Some(file) = self.layers.load_layer_file(&path) else {
                continue;
            };

            let territory_ref = TerritoryRef::from(territory);
            for object in file.instance_objects() {
                if object.asset_type != LayerEntryType::EventNpc || object.base_id == 0 {
                    continue;
                }

                self.locations.entry(object.base_id).or_insert_with(|| {
                    NpcLocation::new(object.translation.x, object.translation.z, territory_ref.clone())
                });
            }
        }

        self.locations.len() - before
    }

    /// Pass 2. Spawn points only fill NPCs the scene layers missed.
    pub fn spawn_point_pass(&mut self) -> usize {
        let repo = self.repo;
        let before = self.locations.len();

        for level in repo.rows::<Level>() {
            if level.kind != NPC_SPAWN_LEVEL_TYPE {
                continue;
            }
            let Entry::Vacant(entry) = self.locations.entry(level.object) else {
                continue;
            };
            let Some(territory) = repo.row::<TerritoryType>(level.territory) else {
                continue;
            };

            entry.insert(NpcLocation::new(level.x, level.z, territory.into()));
        }

        self.locations.len() - before
    }

    /// Pass 3
    pub fn territory_fix_pass(&mut self, corrections: &LocationCorrections) {
        let Some(fix) = &corrections.territory_fix else {
            return;
        };
        let territory = self.territory(fix.territory);

        for npc in &fix.npcs {
            match self.locations.get_mut(npc) {
                Some(location) => location.territory = territory.clone(),
                None => debug!("Territory fix skipped for unlocated NPC {}", npc),
            }
        }
    }

    /// Pass 4
    pub fn correction_pass(&mut self, corrections: &LocationCorrections) {
        for correction in &corrections.replace {
            let location = self.corrected(correction);
            self.locations.insert(correction.npc, location);
        }

        for correction in &corrections.insert {
            if !self.locations.contains_key(&correction.npc) {
                let location = self.corrected(correction);
                self.locations.insert(correction.npc, location);
            }
        }

        for group in &corrections.insert_group {
            let territory = self.territory(group.territory);
            for &npc in &group.npcs {
                self.locations
                    .entry(npc)
                    .or_insert_with(|| NpcLocation::new(group.x, group.z, territory.clone()));
            }
        }

        debug!("Applied {} location corrections", corrections.len());
    }

    fn corrected(&self, correction: &Correction) -> NpcLocation {
        NpcLocation {
            x: correction.x,
            z: correction.z,
            territory: self.territory(correction.territory),
            map_scale: correction.map_scale,
        }
    }

    fn territory(&self, id: u32) -> TerritoryRef {
        self.repo
            .row::<TerritoryType>(id)
            .map(TerritoryRef::from)
            .unwrap_or_else(|| TerritoryRef::bare(id))
    }
}
