//! Record Repository
//!
//! Read-only access to typed game-data sheets.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::RepositoryError;
use super::sheets::{Sheet, SubrowSheet};

/// Read-only accessor for typed sheets
pub trait RecordRepository: Send + Sync {
    /// Whether the source has finished loading and may be queried
    fn is_ready(&self) -> bool;

    /// Get a row by id
    fn row<T: Sheet>(&self, id: u32) -> Option<&T>;

    /// Get a sub-row by (group, index).
    ///
    /// Returns `Ok(None)` when the group has no row at that index. Indexing past
    /// the end of an existing group may fault instead; callers paging through a
    /// group treat both as the end of the group.
    fn subrow<T: SubrowSheet>(&self, group: u32, index: u32) -> Result<Option<&T>, RepositoryError>;

    /// Iterate every row of a sheet in row id order
    fn rows<T: Sheet>(&self) -> Box<dyn Iterator<Item = &T> + '_>;
}

type Rows<T> = BTreeMap<u32, T>;
type Groups<T> = BTreeMap<u32, BTreeMap<u32, T>>;

/// In-memory repository holding every sheet as a typed table
pub struct MemoryRepository {
    sheets: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    ready: AtomicBool,
}

impl MemoryRepository {
    /// Create an empty repository that is not yet ready
    pub fn new() -> Self {
        Self {
            sheets: HashMap::new(),
            ready: AtomicBool::new(false),
        }
    }

    /// Mark loading as complete (or not)
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Insert or replace a row
    pub fn insert<T: Sheet>(&mut self, row: T) {
        self.table_mut::<Rows<T>>().insert(row.row_id(), row);
    }

    /// Insert or replace a sub-row
    pub fn insert_subrow<T: SubrowSheet>(&mut self, row: T) {
        self.table_mut::<Groups<T>>()
            .entry(row.row_id())
            .or_default()
            .insert(row.sub_row_id(), row);
    }

    /// Insert many rows at once
    pub fn extend<T: Sheet>(&mut self, rows: impl IntoIterator<Item = T>) {
        for row in rows {
            self.insert(row);
        }
    }

    /// Insert many sub-rows at once
    pub fn extend_subrows<T: SubrowSheet>(&mut self, rows: impl IntoIterator<Item = T>) {
        for row in rows {
            self.insert_subrow(row);
        }
    }

    /// Number of rows (or sub-rows) held for a sheet type
    pub fn len<T: Sheet>(&self) -> usize {
        if let Some(rows) = self.table::<Rows<T>>() {
            return rows.len();
        }
        self.table::<Groups<T>>()
            .map(|groups| groups.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }

    fn table<S: Any>(&self) -> Option<&S> {
        self.sheets.get(&TypeId::of::<S>())?.downcast_ref::<S>()
    }

    fn table_mut<S: Any + Send + Sync + Default>(&mut self) -> &mut S {
        let table = self
            .sheets
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Box::new(S::default()) as Box<dyn Any + Send + Sync>);

        match table.downcast_mut::<S>() {
            Some(table) => table,
            None => unreachable!("sheet tables are keyed by their own TypeId"),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordRepository for MemoryRepository {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn row<T: Sheet>(&self, id: u32) -> Option<&T> {
        self.table::<Rows<T>>()?.get(&id)
    }

    fn subrow<T: SubrowSheet>(&self, group: u32, index: u32) -> Result<Option<&T>, RepositoryError> {
        let Some(rows) = self.table::<Groups<T>>().and_then(|groups| groups.get(&group)) else {
            return Ok(None);
        };

        match rows.last_key_value() {
            Some((&last, _)) if index > last => Err(RepositoryError::SubrowOutOfRange {
                sheet: T::NAME,
                group,
                index,
            }),
            _ => Ok(rows.get(&index)),
        }
    }

    fn rows<T: Sheet>(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self.table::<Rows<T>>() {
            Some(rows) => Box::new(rows.values()),
            None => Box::new(std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sheets::{GilShop, GilShopItem};

    fn shop_item(shop: u32, index: u32, item: u32) -> GilShopItem {
        GilShopItem {
            row_id: shop,
            sub_row_id: index,
            item,
        }
    }

    #[test]
    fn test_rows_by_id_and_in_order() {
        let mut repo = MemoryRepository::new();
        repo.insert(GilShop { row_id: 262145, name: "Second".into() });
        repo.insert(GilShop { row_id: 262144, name: "First".into() });

        assert_eq!(repo.row::<GilShop>(262145).unwrap().name, "Second");
        assert!(repo.row::<GilShop>(1).is_none());

        let names: Vec<&str> = repo.rows::<GilShop>().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(repo.len::<GilShop>(), 2);
    }

    #[test]
    fn test_subrow_missing_group_is_absent() {
        let repo = MemoryRepository::new();
        assert!(matches!(repo.subrow::<GilShopItem>(262144, 0), Ok(None)));
    }

    #[test]
    fn test_subrow_past_end_faults() {
        let mut repo = MemoryRepository::new();
        repo.extend_subrows([shop_item(262144, 0, 10), shop_item(262144, 2, 12)]);

        assert_eq!(repo.subrow::<GilShopItem>(262144, 0).unwrap().unwrap().item, 10);
        assert!(matches!(repo.subrow::<GilShopItem>(262144, 1), Ok(None)));
        assert!(matches!(
            repo.subrow::<GilShopItem>(262144, 3),
            Err(RepositoryError::SubrowOutOfRange { group: 262144, index: 3, .. })
        ));
        assert_eq!(repo.len::<GilShopItem>(), 2);
    }

    #[test]
    fn test_ready_flag() {
        let repo = MemoryRepository::new();
        assert!(!repo.is_ready());
        repo.set_ready(true);
        assert!(repo.is_ready());
    }
}
