//! Indexed, immutable view of one loaded dataset.
//!
//! A `Catalog` keeps items in load order and derives a name index and a type
//! index from them. Duplicate names are tolerated: both records stay in
//! `items`, and the name index points at the last one.

use crate::catalog::identity::{ItemName, ItemType};
use crate::catalog::model::Item;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
/// Items plus derived lookups keyed by name and by type.
pub struct Catalog {
    items: Vec<Item>,
    by_name: BTreeMap<ItemName, usize>,
    by_type: BTreeMap<ItemType, Vec<usize>>,
    skipped: usize,
}

impl Catalog {
    /// Build the indexes over `items`, keeping their order.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut by_name = BTreeMap::new();
        let mut by_type: BTreeMap<ItemType, Vec<usize>> = BTreeMap::new();
        for (idx, item) in items.iter().enumerate() {
            by_name.insert(item.name.clone(), idx);
            by_type.entry(item.item_type.clone()).or_default().push(idx);
        }
        Self {
            items,
            by_name,
            by_type,
            skipped: 0,
        }
    }

    pub(crate) fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of raw records dropped while building this catalog.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Resolve an item by name.
    ///
    /// Returns `None` for names the catalog does not know; overlay entries
    /// may legitimately dangle after a reload.
    pub fn get(&self, name: &ItemName) -> Option<&Item> {
        self.by_name.get(name).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, name: &ItemName) -> bool {
        self.by_name.contains_key(name)
    }

    /// Distinct type labels in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &ItemType> {
        self.by_type.keys()
    }

    /// Items of one type in load order; empty for unknown types.
    pub fn items_of_type<'a>(
        &'a self,
        item_type: &ItemType,
    ) -> impl Iterator<Item = &'a Item> + use<'a> {
        self.by_type
            .get(item_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&idx| &self.items[idx])
    }

    /// Pick one item uniformly at random.
    pub fn random_item<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Item> {
        self.items.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample() -> Catalog {
        Catalog::from_items(vec![
            Item::named("Sword").with_type("Weapon"),
            Item::named("Shield").with_type("Armor"),
            Item::named("Axe").with_type("Weapon"),
            Item::named("Pebble"),
        ])
    }

    #[test]
    fn type_index_keeps_load_order() {
        let catalog = sample();
        let weapons: Vec<&str> = catalog
            .items_of_type(&ItemType::from("Weapon"))
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(weapons, vec!["Sword", "Axe"]);
        assert_eq!(catalog.items_of_type(&ItemType::from("Ring")).count(), 0);
    }

    #[test]
    fn types_are_sorted_and_include_sentinel() {
        let catalog = sample();
        let types: Vec<&str> = catalog.types().map(ItemType::as_str).collect();
        assert_eq!(types, vec!["Armor", "Other", "Weapon"]);
    }

    #[test]
    fn duplicate_names_resolve_to_last_record() {
        let catalog = Catalog::from_items(vec![
            Item::named("Sword").with_description("first"),
            Item::named("Sword").with_description("second"),
        ]);
        assert_eq!(catalog.len(), 2);
        let found = catalog.get(&ItemName::from("Sword")).unwrap();
        assert_eq!(found.long_description, "second");
    }

    #[test]
    fn random_item_handles_empty_and_populated() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(Catalog::default().random_item(&mut rng).is_none());
        let catalog = sample();
        let picked = catalog.random_item(&mut rng).unwrap();
        assert!(catalog.contains(&picked.name));
    }
}
