//! Item records and their storage.

pub mod store;
pub mod types;

pub use store::{sample_items, Clock, InMemoryItemStore, ItemRepository, SystemClock};

#[cfg(test)]
pub use store::ManualClock;
pub use types::{Category, Item, ItemPatch, ItemStats, NewItem, Priority};
