//! Item catalog wiring.
//!
//! `model` defines the canonical item record and its tolerant coercion from
//! raw JSON, `index` derives name and type lookups over one loaded dataset,
//! and `repository` owns the live catalog that queries read from.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;

pub use identity::{DEFAULT_RARITY, ItemName, ItemType, OTHER_TYPE, Rarity, infobox_keys};
pub use index::Catalog;
pub use model::{Infobox, Item, RecordRejection, normalize_record};
pub use repository::CatalogStore;
