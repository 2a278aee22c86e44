use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Sentinel category for records that carry no `type`.
pub const OTHER_TYPE: &str = "Other";

/// Rarity assumed when an item's infobox has no `rarity` entry.
pub const DEFAULT_RARITY: &str = "Common";

/// Infobox keys the engine reads. Everything else in the infobox is opaque.
pub mod infobox_keys {
    pub const ICON: &str = "icon";
    pub const RARITY: &str = "rarity";
    pub const FLAVOR_TEXT: &str = "flavor_text";
    pub const BLUEPRINT_LOCATION: &str = "blueprintlocation";
    pub const BLUEPRINT_COST: &str = "blueprintcost";
    pub const CRITICAL_HIT: &str = "critical_hit";
    pub const COMBO: &str = "combo";
    pub const BASE_DPS: &str = "Base Dps";
}

/// Identity of an item across the catalog and the overlay.
///
/// Favorites, unlocks, notes and the compare selection all reference items
/// by name, so a name may outlive the catalog that introduced it.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(pub String);

impl ItemName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemName {
    fn from(value: &str) -> Self {
        ItemName(value.to_string())
    }
}

impl From<String> for ItemName {
    fn from(value: String) -> Self {
        ItemName(value)
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category label of an item. Blank labels collapse to [`OTHER_TYPE`].
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemType(String);

impl ItemType {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        if label.trim().is_empty() {
            Self::other()
        } else {
            ItemType(label)
        }
    }

    pub fn other() -> Self {
        ItemType(OTHER_TYPE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemType {
    fn from(value: &str) -> Self {
        ItemType::new(value)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ItemType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Rarity tier read from `infobox.rarity`.
///
/// Known tiers keep matching and display consistent; `Other` carries tiers
/// a dataset introduces without breaking older builds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Other(String),
}

impl Rarity {
    pub fn as_str(&self) -> &str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Other(value) => value.as_str(),
        }
    }

    pub fn from_label(value: &str) -> Self {
        match value {
            "Common" => Rarity::Common,
            "Uncommon" => Rarity::Uncommon,
            "Rare" => Rarity::Rare,
            "Epic" => Rarity::Epic,
            "Legendary" => Rarity::Legendary,
            other => Rarity::Other(other.to_string()),
        }
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::from_label(DEFAULT_RARITY)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rarity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_labels_cover_known_and_unknown_tiers() {
        let known = Rarity::from_label("Legendary");
        assert_eq!(known, Rarity::Legendary);
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"Legendary\"");

        let unknown = Rarity::from_label("Mythic");
        assert_eq!(unknown, Rarity::Other("Mythic".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"Mythic\"");
    }

    #[test]
    fn rarity_matching_is_case_sensitive() {
        assert_eq!(Rarity::from_label("rare"), Rarity::Other("rare".into()));
        assert_eq!(Rarity::default(), Rarity::Common);
    }

    #[test]
    fn blank_types_become_other() {
        assert_eq!(ItemType::new("  ").as_str(), OTHER_TYPE);
        assert_eq!(ItemType::new(""), ItemType::other());
        assert_eq!(ItemType::new("Weapon").as_str(), "Weapon");
    }

    #[test]
    fn item_name_is_transparent() {
        let name = ItemName::from("Sword");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Sword\"");
        let parsed: ItemName = serde_json::from_str("\"Sword\"").unwrap();
        assert_eq!(parsed, name);
    }
}
