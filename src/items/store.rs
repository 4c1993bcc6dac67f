//! Item storage: the repository contract and its in-memory implementation.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::types::{Category, Item, ItemPatch, ItemStats, NewItem, Priority};
use crate::error::StoreError;
use crate::metrics;

/// Source of "now" for item timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<OffsetDateTime>,
}

#[cfg(test)]
impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.now
            .lock()
            .map(|now| *now)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Data-access contract for items.
///
/// Handlers only see this trait so the in-memory store can be swapped for a
/// persistent one.
pub trait ItemRepository: Send + Sync {
    /// Snapshot of all items in insertion order.
    fn list(&self) -> Result<Vec<Item>, StoreError>;

    /// Look up one item.
    fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Store a new item, assigning its id and timestamps.
    fn add(&self, item: NewItem) -> Result<Item, StoreError>;

    /// Merge `patch` into an existing item and refresh `updated_at`.
    fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, StoreError>;

    /// Remove an item.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Summary counts over the current items.
    fn stats(&self) -> Result<ItemStats, StoreError> {
        Ok(ItemStats::from_items(&self.list()?))
    }
}

/// Vec-backed store. Lookups are linear scans.
pub struct InMemoryItemStore {
    items: RwLock<Vec<Item>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryItemStore {
    /// Empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty store on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Store on the system clock holding the two sample items.
    pub fn seeded() -> Self {
        Self::new().with_sample_items()
    }

    /// Append the sample items, stamped with the store clock.
    pub fn with_sample_items(self) -> Self {
        let now = self.clock.now();
        if let Ok(mut items) = self.items.write() {
            items.extend(sample_items(now));
        }
        self
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Item>>, StoreError> {
        self.items.read().map_err(|_| StoreError::Unavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Item>>, StoreError> {
        self.items.write().map_err(|_| StoreError::Unavailable)
    }

    /// Timestamp for a modification, strictly after `previous`.
    fn next_timestamp(&self, previous: OffsetDateTime) -> OffsetDateTime {
        let now = self.clock.now();
        if now > previous {
            now
        } else {
            previous + Duration::milliseconds(1)
        }
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemRepository for InMemoryItemStore {
    fn list(&self) -> Result<Vec<Item>, StoreError> {
        let _timer = metrics::timer_store_op("list");
        Ok(self.read()?.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let _timer = metrics::timer_store_op("get");
        Ok(self.read()?.iter().find(|item| item.id == id).cloned())
    }

    #[instrument(skip(self, new), fields(title = %new.title))]
    fn add(&self, new: NewItem) -> Result<Item, StoreError> {
        let _timer = metrics::timer_store_op("add");
        let mut items = self.write()?;

        let mut id = Uuid::new_v4().to_string();
        while items.iter().any(|item| item.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let now = self.clock.now();
        let item = Item {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            completed: new.completed,
            priority: new.priority,
            created_at: now,
            updated_at: now,
        };
        items.push(item.clone());

        metrics::inc_items_created();
        info!(id = %item.id, category = %item.category, "Item created");
        Ok(item)
    }

    #[instrument(skip(self, patch))]
    fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, StoreError> {
        let _timer = metrics::timer_store_op("update");
        let mut items = self.write()?;

        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        if patch.is_empty() {
            debug!("Empty patch, refreshing updatedAt only");
        }

        let updated_at = self.next_timestamp(items[index].updated_at);
        let item = &mut items[index];
        patch.apply_to(item);
        item.updated_at = updated_at;

        metrics::inc_items_updated();
        info!(id = %item.id, completed = item.completed, "Item updated");
        Ok(item.clone())
    }

    #[instrument(skip(self))]
    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _timer = metrics::timer_store_op("delete");
        let mut items = self.write()?;

        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        items.remove(index);

        metrics::inc_items_deleted();
        info!(id, remaining = items.len(), "Item deleted");
        Ok(())
    }
}

/// The records a fresh store starts with.
pub fn sample_items(now: OffsetDateTime) -> Vec<Item> {
    vec![
        Item {
            id: "1".to_string(),
            title: "Learn React Hooks".to_string(),
            description: "Master useState, useEffect, and custom hooks".to_string(),
            category: Category::Learning.to_string(),
            completed: false,
            priority: Priority::High.to_string(),
            created_at: now,
            updated_at: now,
        },
        Item {
            id: "2".to_string(),
            title: "Build CRUD API".to_string(),
            description: "Create a REST API with proper conventions".to_string(),
            category: Category::Development.to_string(),
            completed: true,
            priority: Priority::Medium.to_string(),
            created_at: now,
            updated_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn frozen_store() -> (Arc<ManualClock>, InMemoryItemStore) {
        let clock = Arc::new(ManualClock::new(datetime!(2024-05-01 09:30 UTC)));
        let store = InMemoryItemStore::with_clock(clock.clone());
        (clock, store)
    }

    #[test]
    fn seeded_store_lists_samples_in_order() {
        let store = InMemoryItemStore::seeded();
        let items = store.list().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].priority, "high");
        assert_eq!(items[1].id, "2");
        assert!(items[1].completed);
    }

    #[test]
    fn add_assigns_unique_id_and_equal_timestamps() {
        let (_clock, store) = frozen_store();

        let first = store.add(NewItem::new("A", "B")).unwrap();
        let second = store.add(NewItem::new("A", "B")).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(first.category, "General");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let (_clock, store) = frozen_store();
        let ids: Vec<String> = ["one", "two", "three"]
            .iter()
            .map(|t| store.add(NewItem::new(*t, "x")).unwrap().id)
            .collect();

        let listed: Vec<String> = store.list().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn list_returns_a_snapshot() {
        let (_clock, store) = frozen_store();
        store.add(NewItem::new("A", "B")).unwrap();

        let mut snapshot = store.list().unwrap();
        snapshot[0].title = "changed".to_string();
        snapshot.clear();

        assert_eq!(store.list().unwrap()[0].title, "A");
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = InMemoryItemStore::seeded();
        assert!(store.get("missing").unwrap().is_none());
        assert_eq!(store.get("2").unwrap().unwrap().title, "Build CRUD API");
    }

    #[test]
    fn update_merges_and_advances_updated_at() {
        let (clock, store) = frozen_store();
        let created = store.add(NewItem::new("A", "B")).unwrap();

        clock.advance(Duration::seconds(5));
        let updated = store
            .update(
                &created.id,
                ItemPatch {
                    title: Some("A2".to_string()),
                    ..ItemPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.description, "B");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.updated_at, created.created_at + Duration::seconds(5));
        assert_eq!(store.get(&created.id).unwrap().unwrap(), updated);
    }

    #[test]
    fn update_advances_updated_at_when_clock_is_still() {
        let (_clock, store) = frozen_store();
        let created = store.add(NewItem::new("A", "B")).unwrap();

        let first = store.update(&created.id, ItemPatch::default()).unwrap();
        let second = store.update(&created.id, ItemPatch::default()).unwrap();

        assert!(first.updated_at > created.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.created_at, created.created_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = InMemoryItemStore::seeded();
        let err = store.update("nope", ItemPatch::default()).unwrap_err();
        assert_eq!(err, StoreError::NotFound { id: "nope".to_string() });
    }

    #[test]
    fn delete_removes_item() {
        let store = InMemoryItemStore::seeded();
        store.delete("1").unwrap();

        assert!(store.get("1").unwrap().is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.delete("1").unwrap_err(),
            StoreError::NotFound { id: "1".to_string() }
        );
    }

    #[test]
    fn stats_follow_mutations() {
        let store = InMemoryItemStore::seeded();
        assert_eq!(store.stats().unwrap().completed, 1);

        store
            .update(
                "1",
                ItemPatch {
                    completed: Some(true),
                    ..ItemPatch::default()
                },
            )
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.categories, 2);
    }
}
