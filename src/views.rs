//! Read-only projections a UI renders: detail, compare, favorites, unlocks.

use crate::catalog::{Catalog, Item, ItemName, Rarity, infobox_keys};
use crate::error::EngineError;
use crate::overlay::Overlay;
use serde::Serialize;

/// Everything the detail view shows for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetail<'a> {
    pub item: &'a Item,
    pub icon: String,
    pub rarity: Rarity,
    pub favorite: bool,
    pub unlocked: bool,
    pub note: Option<&'a str>,
    pub flavor_text: Option<&'a str>,
    pub blueprint_location: Option<&'a str>,
    pub blueprint_cost: Option<&'a str>,
    pub critical_hit: Option<&'a str>,
}

/// Resolve `name` into its detail view.
///
/// Stale overlay references are common after a reload, so a missing name is
/// a `NotFound` the caller can treat as a no-op.
pub fn item_detail<'a>(
    catalog: &'a Catalog,
    overlay: &'a Overlay,
    name: &ItemName,
) -> Result<ItemDetail<'a>, EngineError> {
    let item = catalog
        .get(name)
        .ok_or_else(|| EngineError::NotFound(name.clone()))?;
    Ok(ItemDetail {
        item,
        icon: icon_path(item),
        rarity: item.rarity(),
        favorite: overlay.is_favorite(&item.name),
        unlocked: overlay.is_unlocked(&item.name),
        note: overlay.note(&item.name),
        flavor_text: item.attr(infobox_keys::FLAVOR_TEXT),
        blueprint_location: item.attr(infobox_keys::BLUEPRINT_LOCATION),
        blueprint_cost: item.attr(infobox_keys::BLUEPRINT_COST),
        critical_hit: item.attr(infobox_keys::CRITICAL_HIT),
    })
}

/// Items in the compare selection, in selection order. Names the catalog
/// does not know are skipped.
pub fn compare_view<'a>(catalog: &'a Catalog, overlay: &Overlay) -> Vec<&'a Item> {
    overlay
        .compare_selection()
        .names()
        .iter()
        .filter_map(|name| catalog.get(name))
        .collect()
}

/// Favorited items in catalog order.
pub fn favorite_items<'a>(catalog: &'a Catalog, overlay: &Overlay) -> Vec<&'a Item> {
    catalog
        .items()
        .iter()
        .filter(|item| overlay.is_favorite(&item.name))
        .collect()
}

/// Unlocked names, dangling ones included.
pub fn unlock_tracker(overlay: &Overlay) -> Vec<&ItemName> {
    overlay.unlocks().iter().collect()
}

/// Icon location: the infobox `icon` when present, otherwise
/// `icons/<name>.png` with whitespace, `:`, `'` and `-` replaced by `_`.
pub fn icon_path(item: &Item) -> String {
    if let Some(icon) = item.attr(infobox_keys::ICON) {
        return icon.to_string();
    }
    let stem: String = item
        .name
        .as_str()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, ':' | '\'' | '-') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("icons/{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{MemoryStorage, OverlayStore};

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            Item::named("Arc Blade")
                .with_attr("flavor_text", "Hums softly.")
                .with_attr("blueprintlocation", "Vault 3")
                .with_attr("blueprintcost", "250")
                .with_attr("critical_hit", "Shock"),
            Item::named("Shield").with_attr("icon", "static/shield.png"),
        ])
    }

    #[test]
    fn detail_carries_well_known_fields_and_markers() {
        let catalog = catalog();
        let mut store = OverlayStore::restore(MemoryStorage::new());
        store.toggle_favorite("Arc Blade").unwrap();
        store.set_note("Arc Blade", "craft first").unwrap();

        let detail = item_detail(&catalog, store.overlay(), &ItemName::from("Arc Blade")).unwrap();
        assert!(detail.favorite);
        assert!(!detail.unlocked);
        assert_eq!(detail.note, Some("craft first"));
        assert_eq!(detail.rarity, Rarity::Common);
        assert_eq!(detail.flavor_text, Some("Hums softly."));
        assert_eq!(detail.blueprint_location, Some("Vault 3"));
        assert_eq!(detail.blueprint_cost, Some("250"));
        assert_eq!(detail.critical_hit, Some("Shock"));
        assert_eq!(detail.icon, "icons/Arc_Blade.png");
    }

    #[test]
    fn detail_for_unknown_name_is_not_found() {
        let catalog = catalog();
        let overlay = Overlay::default();
        let err = item_detail(&catalog, &overlay, &ItemName::from("Ghost")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(name) if name.as_str() == "Ghost"));
    }

    #[test]
    fn icon_prefers_infobox_and_sanitizes_names() {
        let catalog = catalog();
        assert_eq!(icon_path(&catalog.items()[1]), "static/shield.png");
        let odd = Item::named("Ol' Reliable: Mk-2");
        assert_eq!(icon_path(&odd), "icons/Ol__Reliable__Mk_2.png");
    }

    #[test]
    fn compare_and_favorites_skip_dangling_names() {
        let catalog = catalog();
        let mut store = OverlayStore::restore(MemoryStorage::new());
        store.toggle_compare("Shield");
        store.toggle_compare("Ghost");
        store.toggle_compare("Arc Blade");
        store.toggle_favorite("Ghost").unwrap();
        store.toggle_favorite("Shield").unwrap();
        store.toggle_unlock("Ghost").unwrap();

        let compared: Vec<&str> = compare_view(&catalog, store.overlay())
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(compared, vec!["Shield", "Arc Blade"]);

        let favorites = favorite_items(&catalog, store.overlay());
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name.as_str(), "Shield");

        let tracker = unlock_tracker(store.overlay());
        assert_eq!(tracker, vec![&ItemName::from("Ghost")]);
    }
}
