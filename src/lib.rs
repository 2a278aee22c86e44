//! Catalog engine for browsing a fixed set of game items.
//!
//! The crate loads a JSON item dataset into an indexed [`Catalog`], answers
//! filter/sort/search/pagination queries over it, and keeps user annotations
//! (favorites, unlocks, notes, compare selection) in an [`OverlayStore`] that
//! persists to a key/value backend. Rendering is left to callers; the
//! `itemdex` binary is one such caller.
//!
//! Load failures never disturb state that is already installed: the
//! [`CatalogStore`] only swaps catalogs on a successful build, and overlay
//! restore turns corrupt records into empty defaults.

pub mod adapter;
pub mod catalog;
pub mod config;
pub mod error;
pub mod overlay;
pub mod query;
pub mod source;
pub mod views;

pub use adapter::{
    EXPORT_FILE_NAME, EXPORT_MIME_TYPE, ExportArtifact, build_catalog, build_catalog_from_value,
    export_artifact, export_items,
};
pub use catalog::{Catalog, CatalogStore, Infobox, Item, ItemName, ItemType, Rarity};
pub use config::Config;
pub use error::EngineError;
pub use overlay::{
    COMPARE_CAPACITY, CompareOutcome, DirStorage, MemoryStorage, Overlay, OverlayStorage,
    OverlayStore, StorageError,
};
pub use query::{
    DEFAULT_PAGE_SIZE, Query, QueryHit, QueryResult, Scope, SortKey, matching_items, run_query,
};
pub use source::DatasetSource;
pub use views::{ItemDetail, compare_view, favorite_items, icon_path, item_detail, unlock_tracker};

