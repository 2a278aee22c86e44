//! User annotations layered over the catalog.
//!
//! `Overlay` is the plain state the query engine reads; `OverlayStore` wraps
//! it with a storage backend and writes every persisted field back before a
//! mutating call returns. Names are never checked against a catalog: a
//! favorite for an item that disappeared on reload stays put.

use crate::catalog::ItemName;
use crate::overlay::storage::{OverlayStorage, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Storage key for the favorites record (JSON array of names).
pub const FAVORITES_KEY: &str = "dc_favs";
/// Storage key for the unlocks record (JSON array of names).
pub const UNLOCKS_KEY: &str = "dc_unlocks";
/// Storage key for the notes record (JSON object of name to text).
pub const NOTES_KEY: &str = "dc_notes";

/// Most items the compare view holds at once.
pub const COMPARE_CAPACITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    Added,
    Removed,
    /// Selection already full; nothing changed.
    Saturated,
}

/// Ordered, duplicate-free, bounded set of names picked for comparison.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompareSelection {
    names: Vec<ItemName>,
}

impl CompareSelection {
    pub fn toggle(&mut self, name: ItemName) -> CompareOutcome {
        if let Some(pos) = self.names.iter().position(|n| n == &name) {
            self.names.remove(pos);
            CompareOutcome::Removed
        } else if self.names.len() < COMPARE_CAPACITY {
            self.names.push(name);
            CompareOutcome::Added
        } else {
            CompareOutcome::Saturated
        }
    }

    pub fn remove(&mut self, name: &ItemName) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        before != self.names.len()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn names(&self) -> &[ItemName] {
        &self.names
    }

    pub fn contains(&self, name: &ItemName) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Favorites, unlocks, notes, and the transient compare selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overlay {
    favorites: BTreeSet<ItemName>,
    unlocks: BTreeSet<ItemName>,
    notes: BTreeMap<ItemName, String>,
    compare: CompareSelection,
}

impl Overlay {
    pub fn is_favorite(&self, name: &ItemName) -> bool {
        self.favorites.contains(name)
    }

    pub fn is_unlocked(&self, name: &ItemName) -> bool {
        self.unlocks.contains(name)
    }

    pub fn note(&self, name: &ItemName) -> Option<&str> {
        self.notes.get(name).map(String::as_str)
    }

    pub fn favorites(&self) -> &BTreeSet<ItemName> {
        &self.favorites
    }

    pub fn unlocks(&self) -> &BTreeSet<ItemName> {
        &self.unlocks
    }

    pub fn notes(&self) -> &BTreeMap<ItemName, String> {
        &self.notes
    }

    pub fn compare_selection(&self) -> &CompareSelection {
        &self.compare
    }
}

/// Overlay plus the backend it persists to.
#[derive(Debug)]
pub struct OverlayStore<S> {
    storage: S,
    overlay: Overlay,
}

impl<S: OverlayStorage> OverlayStore<S> {
    /// Load persisted records from `storage`.
    ///
    /// Missing records start empty. Unreadable or corrupt records are logged
    /// and also start empty; restore itself never fails.
    pub fn restore(storage: S) -> Self {
        let overlay = Overlay {
            favorites: read_record(&storage, FAVORITES_KEY),
            unlocks: read_record(&storage, UNLOCKS_KEY),
            notes: read_record(&storage, NOTES_KEY),
            compare: CompareSelection::default(),
        };
        debug!(
            favorites = overlay.favorites.len(),
            unlocks = overlay.unlocks.len(),
            notes = overlay.notes.len(),
            "restored overlay"
        );
        Self { storage, overlay }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Write favorites, unlocks, and notes as independent records.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        write_record(&mut self.storage, FAVORITES_KEY, &self.overlay.favorites)?;
        write_record(&mut self.storage, UNLOCKS_KEY, &self.overlay.unlocks)?;
        write_record(&mut self.storage, NOTES_KEY, &self.overlay.notes)?;
        Ok(())
    }

    /// Flip favorite membership; returns whether `name` is now a favorite.
    pub fn toggle_favorite(&mut self, name: impl Into<ItemName>) -> Result<bool, StorageError> {
        let now = toggle_member(&mut self.overlay.favorites, name.into());
        self.persist()?;
        Ok(now)
    }

    /// Flip unlock membership; returns whether `name` is now unlocked.
    pub fn toggle_unlock(&mut self, name: impl Into<ItemName>) -> Result<bool, StorageError> {
        let now = toggle_member(&mut self.overlay.unlocks, name.into());
        self.persist()?;
        Ok(now)
    }

    /// Upsert a note. Empty text is stored as an empty note, not a deletion.
    pub fn set_note(
        &mut self,
        name: impl Into<ItemName>,
        text: impl Into<String>,
    ) -> Result<(), StorageError> {
        self.overlay.notes.insert(name.into(), text.into());
        self.persist()
    }

    /// Drop a note entirely; returns whether one existed.
    pub fn remove_note(&mut self, name: &ItemName) -> Result<bool, StorageError> {
        let existed = self.overlay.notes.remove(name).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }

    /// Empty favorites, unlocks, and notes. The compare selection is kept.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.overlay.favorites.clear();
        self.overlay.unlocks.clear();
        self.overlay.notes.clear();
        self.persist()
    }

    pub fn toggle_compare(&mut self, name: impl Into<ItemName>) -> CompareOutcome {
        self.overlay.compare.toggle(name.into())
    }

    pub fn remove_compare(&mut self, name: &ItemName) -> bool {
        self.overlay.compare.remove(name)
    }

    pub fn clear_compare(&mut self) {
        self.overlay.compare.clear();
    }
}

fn toggle_member(set: &mut BTreeSet<ItemName>, name: ItemName) -> bool {
    if set.remove(&name) {
        false
    } else {
        set.insert(name);
        true
    }
}

fn read_record<S, T>(storage: &S, key: &str) -> T
where
    S: OverlayStorage,
    T: DeserializeOwned + Default,
{
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            warn!(key, "unable to read overlay record, starting empty: {err}");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(key, "corrupt overlay record, starting empty: {err}");
        T::default()
    })
}

fn write_record<S, T>(storage: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: OverlayStorage,
    T: Serialize,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    storage.write(key, &encoded)
}
