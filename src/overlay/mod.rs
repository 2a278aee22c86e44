//! User-owned annotation state and its persistence.

pub mod storage;
pub mod store;

pub use storage::{DirStorage, MemoryStorage, OverlayStorage, StorageError};
pub use store::{
    COMPARE_CAPACITY, CompareOutcome, CompareSelection, FAVORITES_KEY, NOTES_KEY, Overlay,
    OverlayStore, UNLOCKS_KEY,
};
