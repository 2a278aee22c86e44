//! Canonical item record and tolerant coercion from raw JSON.
//!
//! Datasets in the wild are loose: fields go missing, infobox values show up
//! as numbers, and whole records are sometimes something other than an
//! object. `normalize_record` turns any such value into an [`Item`] or
//! explains why it cannot be addressed.

use crate::catalog::identity::{DEFAULT_RARITY, ItemName, ItemType, Rarity, infobox_keys};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attribute bag attached to an item (stats, flavor text, unlock cost, icon).
pub type Infobox = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One normalized catalog entry, serialized in the dataset's field layout.
pub struct Item {
    pub name: ItemName,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub long_description: String,
    pub infobox: Infobox,
    pub url: String,
}

impl Item {
    /// Bare item with defaults everywhere but the name.
    pub fn named(name: impl Into<ItemName>) -> Self {
        Item {
            name: name.into(),
            item_type: ItemType::other(),
            long_description: String::new(),
            infobox: Infobox::new(),
            url: String::new(),
        }
    }

    pub fn with_type(mut self, item_type: impl Into<ItemType>) -> Self {
        self.item_type = item_type.into();
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.long_description = text.into();
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.infobox.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.infobox.get(key).map(String::as_str)
    }

    /// Raw rarity label; items without one count as `Common`.
    pub fn rarity_label(&self) -> &str {
        self.attr(infobox_keys::RARITY).unwrap_or(DEFAULT_RARITY)
    }

    pub fn rarity(&self) -> Rarity {
        Rarity::from_label(self.rarity_label())
    }

    /// Lowercased haystack for free-text search: name, description, and every
    /// infobox value, space-joined.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.infobox.len() + 2);
        parts.push(self.name.as_str());
        parts.push(&self.long_description);
        parts.extend(self.infobox.values().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

/// Why a raw record was left out of the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordRejection {
    NotAnObject,
    MissingName,
}

impl RecordRejection {
    pub fn describe(&self) -> &'static str {
        match self {
            RecordRejection::NotAnObject => "record is not a JSON object",
            RecordRejection::MissingName => "record has no usable name",
        }
    }
}

/// Coerce one raw dataset record into an [`Item`].
pub fn normalize_record(value: Value) -> Result<Item, RecordRejection> {
    let Value::Object(mut fields) = value else {
        return Err(RecordRejection::NotAnObject);
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => ItemName(name),
        _ => return Err(RecordRejection::MissingName),
    };

    let item_type = match fields.remove("type") {
        Some(Value::String(label)) => ItemType::new(label),
        _ => ItemType::other(),
    };

    let infobox = match fields.remove("infobox") {
        Some(Value::Object(map)) => normalize_infobox(map),
        _ => Infobox::new(),
    };

    Ok(Item {
        name,
        item_type,
        long_description: take_string(&mut fields, "long_description"),
        infobox,
        url: take_string(&mut fields, "url"),
    })
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.remove(key) {
        Some(Value::String(text)) => text,
        _ => String::new(),
    }
}

fn normalize_infobox(map: Map<String, Value>) -> Infobox {
    map.into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(text) => text,
                Value::Number(num) => num.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() {
        let item = normalize_record(json!({"name": "Sword"})).unwrap();
        assert_eq!(item.name.as_str(), "Sword");
        assert_eq!(item.item_type.as_str(), "Other");
        assert!(item.infobox.is_empty());
        assert_eq!(item.long_description, "");
        assert_eq!(item.url, "");
        assert_eq!(item.rarity(), Rarity::Common);
    }

    #[test]
    fn scalar_infobox_values_become_text() {
        let item = normalize_record(json!({
            "name": "Blaster",
            "infobox": {
                "Base Dps": 42,
                "two_handed": true,
                "rarity": "Epic",
                "bad": null,
                "nested": {"a": 1}
            }
        }))
        .unwrap();
        assert_eq!(item.attr("Base Dps"), Some("42"));
        assert_eq!(item.attr("two_handed"), Some("true"));
        assert_eq!(item.rarity(), Rarity::Epic);
        assert!(item.attr("bad").is_none());
        assert!(item.attr("nested").is_none());
    }

    #[test]
    fn unaddressable_records_are_rejected() {
        assert_eq!(
            normalize_record(json!("Sword")),
            Err(RecordRejection::NotAnObject)
        );
        assert_eq!(
            normalize_record(json!({"type": "Weapon"})),
            Err(RecordRejection::MissingName)
        );
        assert_eq!(
            normalize_record(json!({"name": "   "})),
            Err(RecordRejection::MissingName)
        );
        assert_eq!(
            normalize_record(json!({"name": 7})),
            Err(RecordRejection::MissingName)
        );
    }

    #[test]
    fn serializes_in_dataset_layout() {
        let item = Item::named("Sword").with_type("Weapon").with_attr("rarity", "Rare");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "Weapon");
        assert_eq!(value["infobox"]["rarity"], "Rare");
        assert_eq!(value["long_description"], "");
        assert!(value.get("item_type").is_none());
    }

    #[test]
    fn search_text_spans_all_values() {
        let item = Item::named("Sword")
            .with_description("A Sharp Edge")
            .with_attr("flavor_text", "Forged in FIRE");
        let text = item.search_text();
        assert!(text.contains("sword"));
        assert!(text.contains("sharp edge"));
        assert!(text.contains("forged in fire"));
    }
}
