//! Vendor Lookup
//!
//! Runs the one-shot vendor build in the background and serves lookups once
//! it is done. Reads before the build finishes see nothing, never a partial
//! index.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::data::{LayerSource, RecordRepository};
use crate::location::{LocationCorrections, LocationResolver};
use crate::model::{ItemInfo, NpcLocation};
use crate::vendor::{ResolverLimits, VendorOverrides, VendorScanner};

/// Default interval between data source readiness checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Build progress. Moves forward only; `Ready` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Uninitialized,
    WaitingForSource,
    Building,
    Ready,
}

/// Everything the build needs besides the data itself
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub poll_interval: Duration,
    pub limits: ResolverLimits,
    pub overrides: VendorOverrides,
    pub corrections: LocationCorrections,
}

impl BuildOptions {
    /// Default limits with the compiled-in override and correction tables
    pub fn builtin() -> Result<Self, String> {
        Ok(Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            limits: ResolverLimits::default(),
            overrides: VendorOverrides::builtin()?,
            corrections: LocationCorrections::builtin()?,
        })
    }
}

// ============================================================================
// Vendor Index
// ============================================================================

/// The finished, immutable result of a build
#[derive(Debug, Default)]
pub struct VendorIndex {
    items: HashMap<u32, ItemInfo>,
    locations: HashMap<u32, NpcLocation>,
}

/// Vendors that ended up without a location, with how many item listings
/// each carries
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UnlocatedVendors {
    /// Display name starts with an uppercase letter
    pub named: BTreeMap<String, usize>,
    pub unnamed: BTreeMap<String, usize>,
}

impl UnlocatedVendors {
    pub fn listings(&self) -> usize {
        self.named.values().chain(self.unnamed.values()).sum()
    }
}

impl VendorIndex {
    /// Run the whole build: locations first, since every recorded sale embeds
    /// its vendor's location, then the vendor scan, then achievement rewards.
    pub fn build<R, L>(repo: &R, layers: &L, options: &BuildOptions) -> Self
    where
        R: RecordRepository,
        L: LayerSource,
    {
        let locations = LocationResolver::new(repo, layers).resolve(&options.corrections);

        let mut scanner = VendorScanner::new(repo, &options.limits, &options.overrides, &locations);
        scanner.scan_all();
        scanner.inject_achievement_rewards();
        let items = scanner.finish();

        Self { items, locations }
    }

    pub fn item(&self, item_id: u32) -> Option<&ItemInfo> {
        self.items.get(&item_id)
    }

    pub fn npc_location(&self, npc_id: u32) -> Option<&NpcLocation> {
        self.locations.get(&npc_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn unlocated_vendors(&self) -> UnlocatedVendors {
        let mut report = UnlocatedVendors::default();

        for vendor in self.items.values().flat_map(|item| &item.vendors) {
            if vendor.location.is_some() {
                continue;
            }
            let named = vendor.name.chars().next().is_some_and(char::is_uppercase);
            let bucket = if named { &mut report.named } else { &mut report.unnamed };
            *bucket.entry(vendor.name.clone()).or_default() += 1;
        }

        report
    }

    fn log_unlocated_vendors(&self) {
        let report = self.unlocated_vendors();
        debug!("Items sold by NPCs with no location: {}", report.listings());
        debug!("Named NPCs:");
        for (name, count) in &report.named {
            debug!("{} sells {} items", name, count);
        }
        debug!("Unnamed NPCs:");
        for (name, count) in &report.unnamed {
            debug!("{:?} sells {} items", name, count);
        }
    }
}

// ============================================================================
// Background Build
// ============================================================================

struct Shared {
    state: watch::Sender<BuildState>,
    /// Set exactly once, before the state becomes `Ready`
    index: OnceLock<VendorIndex>,
}

/// Handle to the vendor index, cheap to clone
#[derive(Clone)]
pub struct VendorLookup {
    shared: Arc<Shared>,
}

impl VendorLookup {
    /// Start the background build. It waits for `repo` to report ready,
    /// polling every `options.poll_interval`, then builds once on the blocking
    /// pool. A build that panics leaves the state at `Building`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<R, L>(repo: Arc<R>, layers: Arc<L>, options: BuildOptions) -> Self
    where
        R: RecordRepository + 'static,
        L: LayerSource + 'static,
    {
        let (state, _) = watch::channel(BuildState::Uninitialized);
        let shared = Arc::new(Shared {
            state,
            index: OnceLock::new(),
        });

        shared.state.send_replace(BuildState::WaitingForSource);

        let task_shared = shared.clone();
        tokio::spawn(async move {
            while !repo.is_ready() {
                tokio::time::sleep(options.poll_interval).await;
            }

            task_shared.state.send_replace(BuildState::Building);
            info!("Data source ready, building vendor index");

            // CPU-bound and never yields
            let build = tokio::task::spawn_blocking(move || {
                let index = VendorIndex::build(repo.as_ref(), layers.as_ref(), &options);
                index.log_unlocated_vendors();
                index
            })
            .await;

            let index = match build {
                Ok(index) => index,
                Err(e) => {
                    error!("Vendor index build failed: {}", e);
                    return;
                }
            };

            info!(
                "Vendor index ready: {} items, {} located NPCs",
                index.item_count(),
                index.location_count()
            );

            let _ = task_shared.index.set(index);
            task_shared.state.send_replace(BuildState::Ready);
        });

        Self { shared }
    }

    pub fn state(&self) -> BuildState {
        *self.shared.state.borrow()
    }

    /// The finished index, once the build is `Ready`
    pub fn index(&self) -> Option<&VendorIndex> {
        if self.state() != BuildState::Ready {
            return None;
        }
        self.shared.index.get()
    }

    /// Everything known about where an item is sold. `None` before the build
    /// is ready and for items no vendor sells.
    pub fn get_item_info(&self, item_id: u32) -> Option<&ItemInfo> {
        self.index()?.item(item_id)
    }

    /// Where an NPC stands, with the same readiness rule as item lookups
    pub fn npc_location(&self, npc_id: u32) -> Option<&NpcLocation> {
        self.index()?.npc_location(npc_id)
    }

    /// Resolve once the build is `Ready`
    pub async fn wait_ready(&self) {
        let mut state = self.shared.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = state.wait_for(|state| *state == BuildState::Ready).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LayerFile, MemoryLayers, MemoryRepository};
    use crate::fixtures;
    use std::sync::{Mutex, mpsc};
    use crate::model::{Cost, ItemType};

    fn options() -> BuildOptions {
        BuildOptions {
            poll_interval: Duration::from_millis(5),
            ..BuildOptions::builtin().unwrap()
        }
    }

    #[tokio::test]
    async fn test_nothing_visible_before_ready() {
        let repo = Arc::new(fixtures::dataset());
        repo.set_ready(false);

        let lookup = VendorLookup::spawn(repo.clone(), Arc::new(fixtures::layers()), options());
        assert_eq!(lookup.state(), BuildState::WaitingForSource);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(lookup.state(), BuildState::WaitingForSource);
        assert!(lookup.get_item_info(4718).is_none());
        assert!(lookup.npc_location(1000100).is_none());

        repo.set_ready(true);
        lookup.wait_ready().await;

        assert_eq!(lookup.state(), BuildState::Ready);
        assert!(lookup.get_item_info(4718).is_some());
    }

    /// Holds the first layer load until the test releases it
    struct GatedLayers {
        inner: MemoryLayers,
        gate: Mutex<Option<mpsc::Receiver<()>>>,
    }

    impl LayerSource for GatedLayers {
        fn load_layer_file(&self, path: &str) -> Option<LayerFile> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            self.inner.load_layer_file(path)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_runtime_stays_responsive_while_building() {
        let (release, gate) = mpsc::channel();
        let layers = GatedLayers {
            inner: fixtures::layers(),
            gate: Mutex::new(Some(gate)),
        };

        let lookup = VendorLookup::spawn(Arc::new(fixtures::dataset()), Arc::new(layers), options());

        tokio::time::timeout(Duration::from_secs(5), async {
            while lookup.state() != BuildState::Building {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();

        // The build is parked in the layer pass; timers and reads still run
        tokio::time::timeout(Duration::from_secs(1), tokio::time::sleep(Duration::from_millis(20)))
            .await
            .unwrap();
        assert_eq!(lookup.state(), BuildState::Building);
        assert!(lookup.index().is_none());
        assert!(lookup.get_item_info(4718).is_none());
        assert!(lookup.npc_location(1000100).is_none());

        release.send(()).unwrap();
        lookup.wait_ready().await;

        assert_eq!(lookup.state(), BuildState::Ready);
        assert!(lookup.get_item_info(4718).is_some());
    }

    #[tokio::test]
    async fn test_end_to_end_build() {
        let lookup = VendorLookup::spawn(Arc::new(fixtures::dataset()), Arc::new(fixtures::layers()), options());
        lookup.wait_ready().await;

        // Override vendor, located by its spawn point
        let bronze = lookup.get_item_info(4718).unwrap();
        assert_eq!(bronze.item_type, ItemType::GilShop);
        let junkmonger = bronze.vendor(1025763).unwrap();
        assert_eq!(junkmonger.costs, vec![Cost::new(12, "Gil")]);
        let location = junkmonger.location.as_ref().unwrap();
        assert_eq!((location.x, location.z, location.territory.id), (420.5, -35.25, 614));

        // Generic vendor, located by the scene layer
        let mythril = lookup.get_item_info(4721).unwrap();
        assert_eq!(mythril.vendor(1000100).unwrap().location.as_ref().unwrap().x, 12.5);

        // Reward vendor, located by a built-in correction
        let reward = lookup.get_item_info(6001).unwrap();
        assert_eq!(reward.item_type, ItemType::Achievement);
        assert_eq!(reward.achievement_description, "Reward for Reward 1");
        assert_eq!(reward.vendors.len(), 3);
        let jonathas = lookup.npc_location(1006004).unwrap();
        assert_eq!(jonathas.territory.place_name, "Limsa Lominsa Upper Decks");

        assert!(lookup.get_item_info(4722).is_none());
        assert!(lookup.get_item_info(0).is_none());
    }

    #[tokio::test]
    async fn test_unlocated_vendor_report() {
        let lookup = VendorLookup::spawn(Arc::new(fixtures::dataset()), Arc::new(fixtures::layers()), options());
        lookup.wait_ready().await;

        let report = lookup.index().unwrap().unlocated_vendors();
        assert_eq!(report.named.get("Swift"), Some(&9));
        assert!(report.unnamed.is_empty());
        assert_eq!(report.listings(), 9);
    }

    #[tokio::test]
    async fn test_empty_source_builds_empty_index() {
        let repo = MemoryRepository::new();
        repo.set_ready(true);

        let lookup = VendorLookup::spawn(Arc::new(repo), Arc::new(MemoryLayers::new()), options());
        lookup.wait_ready().await;

        let index = lookup.index().unwrap();
        assert_eq!(index.item_count(), 0);
        // Built-in corrections still place their NPCs
        assert!(index.location_count() > 100);
    }
}
