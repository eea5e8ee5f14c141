//! Test dataset builders

use crate::data::sheets::*;
use crate::data::{InstanceObject, Layer, LayerEntryType, LayerFile, MemoryLayers, MemoryRepository, Vec3};

pub fn item(row_id: u32, name: &str, price_mid: u32) -> Item {
    Item {
        row_id,
        name: name.to_string(),
        description: String::new(),
        price_mid,
    }
}

/// A barter entry with `(currency item, count)` costs and one of each result
pub fn barter(costs: &[(u32, u32)], results: &[u32]) -> SpecialShopEntry {
    SpecialShopEntry {
        costs: Some(costs.iter().map(|&(item, count)| ItemCount { item, count }).collect()),
        results: Some(results.iter().map(|&item| ItemCount { item, count: 1 }).collect()),
    }
}

pub fn gil_shop(repo: &mut MemoryRepository, row_id: u32, name: &str, items: &[u32]) {
    repo.insert(GilShop {
        row_id,
        name: name.to_string(),
    });
    repo.extend_subrows(items.iter().enumerate().map(|(i, &item)| GilShopItem {
        row_id,
        sub_row_id: i as u32,
        item,
    }));
}

pub fn npc(repo: &mut MemoryRepository, row_id: u32, name: &str, npc_data: &[u32]) {
    repo.insert(ENpcBase {
        row_id,
        npc_data: npc_data.to_vec(),
    });
    repo.insert(ENpcResident {
        row_id,
        singular: name.to_string(),
    });
}

/// Currency items and texts every resolver expects
pub fn currencies() -> MemoryRepository {
    let mut repo = MemoryRepository::new();
    repo.insert(item(1, "Gil", 0));
    repo.extend([
        Item {
            row_id: 20,
            name: "Storm Seal".into(),
            description: "A seal issued by the Maelstrom.".into(),
            price_mid: 0,
        },
        Item {
            row_id: 21,
            name: "Serpent Seal".into(),
            description: "A seal issued by the Order of the Twin Adder.".into(),
            price_mid: 0,
        },
        Item {
            row_id: 22,
            name: "Flame Seal".into(),
            description: "A seal issued by the Immortal Flames.".into(),
            price_mid: 0,
        },
    ]);
    repo.insert(Addon {
        row_id: 102233,
        text: "Company Credits".into(),
    });
    repo
}

/// A small world: a gil-shop vendor reached only through the override table,
/// the three achievement reward vendors, and a plain merchant.
///
/// Territory 128 has a scene layer placing the merchant; the junkmonger is
/// placed by a spawn-point row. The repository is marked ready.
pub fn dataset() -> MemoryRepository {
    let mut repo = currencies();

    repo.extend([
        item(4718, "Bronze Ingot", 12),
        item(4719, "Iron Ingot", 30),
        item(4720, "Steel Ingot", 55),
        item(4721, "Mythril Ingot", 90),
        item(4722, "Unsold Ingot", 150),
    ]);
    gil_shop(&mut repo, 262919, "Junk", &[4718, 4719, 4720]);
    gil_shop(&mut repo, 262145, "Fine Metals", &[4721]);

    npc(&mut repo, 1025763, "Doman Junkmonger", &[262145]);
    npc(&mut repo, 1000100, "Merchant", &[262145]);

    for (i, shop_id) in (1769898..=1769906).enumerate() {
        let reward = 6001 + i as u32;
        let name = format!("Reward {}", i + 1);
        repo.insert(item(reward, &name, 0));
        repo.insert(Achievement {
            row_id: 100 + i as u32,
            item: reward,
            description: format!("Reward for {}", name),
        });
        repo.insert(SpecialShop {
            row_id: shop_id,
            name: "Achievement Rewards".into(),
            entries: vec![barter(&[(1, 10)], &[reward])],
        });
    }
    // One reward vendor also reaches a reward shop through its own data
    npc(&mut repo, 1006004, "Jonathas", &[1769898]);
    npc(&mut repo, 1006005, "Nedrick Ironheart", &[]);
    npc(&mut repo, 1006006, "Swift", &[]);

    repo.extend([
        TerritoryType {
            row_id: 128,
            bg: "ffxiv/sea_s1/twn/s1t1/level/s1t1".into(),
            place_name: "Limsa Lominsa Upper Decks".into(),
            map: 11,
        },
        TerritoryType {
            row_id: 131,
            bg: "ffxiv/wil_w1/twn/w1t2/level/w1t2".into(),
            place_name: "Ul'dah - Steps of Thal".into(),
            map: 14,
        },
        TerritoryType {
            row_id: 614,
            bg: "ex2/02_est_e3/fld/e3f4/level/e3f4".into(),
            place_name: "Yanxia".into(),
            map: 371,
        },
    ]);
    repo.insert(Level {
        row_id: 5000,
        x: 420.5,
        y: 0.0,
        z: -35.25,
        kind: 8,
        object: 1025763,
        territory: 614,
    });

    repo.set_ready(true);
    repo
}

pub fn event_npc(base_id: u32, x: f32, z: f32) -> InstanceObject {
    InstanceObject {
        asset_type: LayerEntryType::EventNpc,
        base_id,
        translation: Vec3 { x, y: 0.0, z },
    }
}

/// Scene layers for [`dataset`]
pub fn layers() -> MemoryLayers {
    let mut layers = MemoryLayers::new();
    layers.insert(
        "bg/ffxiv/sea_s1/twn/s1t1/level/planevent.lgb",
        LayerFile {
            layers: vec![Layer {
                name: "npcs".into(),
                instance_objects: vec![event_npc(1000100, 12.5, -40.0)],
            }],
        },
    );
    layers
}
