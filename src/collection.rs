//! Collectible inventory ("passport")
//!
//! Games award items by publishing on an [`EventBus`]. The [`Inventory`]
//! listens, keeps each id once, persists the list and shows a short-lived
//! notification for new items.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bus::{EventBus, Subscription};
use crate::persistence::{KeyValueStore, Versioned, load_or_default, save_versioned};

/// How long the "item collected" toast stays up
pub const NOTIFICATION_MS: u32 = 4000;

/// A collectible reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedItem {
    pub id: String,
    pub name: String,
    /// Icon name understood by the page
    pub icon: String,
    pub description: String,
    /// Local date the item was collected, set on first collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CollectedItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            description: description.into(),
            date: None,
        }
    }
}

/// Collected items in the order they were earned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<CollectedItem>,
}

impl Versioned for Collection {
    const KEY: &'static str = "hamim_collection";
    const VERSION: u32 = 1;

    fn migrate(version: u32, data: serde_json::Value) -> Result<serde_json::Value, crate::StorageError> {
        // The unversioned layout is the same bare array
        match version {
            0 | 1 => Ok(data),
            found => Err(crate::StorageError::UnsupportedVersion {
                found,
                latest: Self::VERSION,
            }),
        }
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item unless one with the same id is already held.
    pub fn collect(&mut self, item: CollectedItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        log::info!("Collected {}", item.id);
        self.items.push(item);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn items(&self) -> &[CollectedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Toast for a newly collected item
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub item: CollectedItem,
    pub remaining_ms: u32,
}

struct InventoryState {
    collection: Collection,
    notification: Option<Notification>,
    store: Rc<dyn KeyValueStore>,
    clock: Box<dyn Fn() -> String>,
}

impl InventoryState {
    fn receive(&mut self, item: &CollectedItem) {
        let mut item = item.clone();
        item.date = Some((self.clock)());
        if !self.collection.collect(item.clone()) {
            return;
        }
        if let Err(e) = save_versioned(&*self.store, &self.collection) {
            log::warn!("Failed to save collection: {e}");
        }
        self.notification = Some(Notification {
            item,
            remaining_ms: NOTIFICATION_MS,
        });
    }
}

/// The page-wide collection, fed by an event bus
pub struct Inventory {
    state: Rc<RefCell<InventoryState>>,
    _subscription: Subscription,
}

impl Inventory {
    /// Load the saved collection and start listening on `bus`.
    pub fn attach(bus: &EventBus<CollectedItem>, store: Rc<dyn KeyValueStore>) -> Self {
        Self::with_clock(bus, store, today)
    }

    pub fn with_clock(
        bus: &EventBus<CollectedItem>,
        store: Rc<dyn KeyValueStore>,
        clock: impl Fn() -> String + 'static,
    ) -> Self {
        let collection: Collection = load_or_default(&*store);
        log::info!("Loaded {} collected items", collection.len());
        let state = Rc::new(RefCell::new(InventoryState {
            collection,
            notification: None,
            store,
            clock: Box::new(clock),
        }));
        let listener = Rc::clone(&state);
        let subscription = bus.subscribe(move |item: &CollectedItem| {
            listener.borrow_mut().receive(item);
        });
        Self {
            state,
            _subscription: subscription,
        }
    }

    pub fn items(&self) -> Vec<CollectedItem> {
        self.state.borrow().collection.items().to_vec()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.borrow().collection.contains(id)
    }

    pub fn notification(&self) -> Option<Notification> {
        self.state.borrow().notification.clone()
    }

    /// Age the notification; it disappears once its time runs out.
    pub fn tick(&self, elapsed_ms: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(n) = state.notification.as_mut() {
            n.remaining_ms = n.remaining_ms.saturating_sub(elapsed_ms);
            if n.remaining_ms == 0 {
                state.notification = None;
            }
        }
    }
}

/// Today's date as shown next to collected items
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    js_sys::Date::new_0()
        .to_locale_date_string("fa-IR", &wasm_bindgen::JsValue::UNDEFINED)
        .into()
}

/// Today's local date as `YYYY-MM-DD`
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn item(id: &str) -> CollectedItem {
        CollectedItem::new(id, "Name", "star", "desc")
    }

    fn inventory(bus: &EventBus<CollectedItem>, store: &Rc<MemoryStore>) -> Inventory {
        Inventory::with_clock(bus, store.clone(), || "1403/07/25".to_string())
    }

    #[test]
    fn test_collect_deduplicates_by_id() {
        let mut collection = Collection::new();
        assert!(collection.collect(item("a")));
        assert!(!collection.collect(item("a")));
        assert!(collection.collect(item("b")));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_published_item_is_saved_and_announced() {
        let bus = EventBus::new();
        let store = Rc::new(MemoryStore::new());
        let inv = inventory(&bus, &store);

        bus.publish(&item("item-tasbih"));
        assert!(inv.contains("item-tasbih"));
        let note = inv.notification().unwrap();
        assert_eq!(note.remaining_ms, NOTIFICATION_MS);
        assert_eq!(note.item.date.as_deref(), Some("1403/07/25"));

        let saved: Collection = load_or_default(&*store);
        assert_eq!(saved.items()[0].id, "item-tasbih");
    }

    #[test]
    fn test_duplicate_award_is_silent() {
        let bus = EventBus::new();
        let store = Rc::new(MemoryStore::new());
        let inv = inventory(&bus, &store);
        bus.publish(&item("a"));
        inv.tick(NOTIFICATION_MS);
        assert_eq!(inv.notification(), None);
        bus.publish(&item("a"));
        assert_eq!(inv.notification(), None);
        assert_eq!(inv.items().len(), 1);
    }

    #[test]
    fn test_notification_expires() {
        let bus = EventBus::new();
        let store = Rc::new(MemoryStore::new());
        let inv = inventory(&bus, &store);
        bus.publish(&item("a"));
        inv.tick(3999);
        assert!(inv.notification().is_some());
        inv.tick(1);
        assert!(inv.notification().is_none());
    }

    #[test]
    fn test_legacy_array_loads() {
        let store = Rc::new(MemoryStore::new());
        store
            .set(
                "hamim_collection",
                r#"[{"id":"x","name":"X","icon":"star","description":"d","date":"1402/01/01"}]"#,
            )
            .unwrap();
        let bus = EventBus::new();
        let inv = inventory(&bus, &store);
        assert!(inv.contains("x"));
    }

    #[test]
    fn test_corrupt_collection_starts_empty() {
        let store = Rc::new(MemoryStore::new());
        store.set("hamim_collection", "not json").unwrap();
        let bus = EventBus::new();
        let inv = inventory(&bus, &store);
        assert!(inv.items().is_empty());
        bus.publish(&item("a"));
        assert_eq!(inv.items().len(), 1);
    }

    #[test]
    fn test_dropping_inventory_unsubscribes() {
        let bus = EventBus::new();
        let store = Rc::new(MemoryStore::new());
        let inv = inventory(&bus, &store);
        drop(inv);
        assert_eq!(bus.publish(&item("a")), 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_attached_inventory_stamps_local_date() {
        let bus = EventBus::new();
        let store = Rc::new(MemoryStore::new());
        let inv = Inventory::attach(&bus, store.clone());
        bus.publish(&item("a"));

        let stamped = inv.items()[0].date.clone().unwrap();
        let date = chrono::NaiveDate::parse_from_str(&stamped, "%Y-%m-%d").unwrap();
        let now = chrono::Local::now().date_naive();
        // Tolerate the test straddling midnight
        assert!((now - date).num_days().abs() <= 1, "{stamped}");
    }
}
