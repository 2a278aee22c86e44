//! Filter, search, sort, and paginate over a catalog.
//!
//! `run_query` is a pure function of its inputs. The overlay only contributes
//! per-row markers (favorite, unlocked, has note); it never changes which
//! items match or in what order.

use crate::catalog::{Catalog, Item, ItemType, infobox_keys};
use crate::overlay::Overlay;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

/// Page size used when a query does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Which slice of the catalog a query starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    All,
    Type(ItemType),
}

/// Field a result list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Type,
    Rarity,
    Dps,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Type => "type",
            SortKey::Rarity => "rarity",
            SortKey::Dps => "dps",
        }
    }

    /// The string an item is compared on; missing fields compare as "".
    fn field<'a>(&self, item: &'a Item) -> &'a str {
        match self {
            SortKey::Name => item.name.as_str(),
            SortKey::Type => item.item_type.as_str(),
            SortKey::Rarity => item.attr(infobox_keys::RARITY).unwrap_or(""),
            SortKey::Dps => item.attr(infobox_keys::BASE_DPS).unwrap_or(""),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Type),
            "rarity" => Ok(SortKey::Rarity),
            "dps" => Ok(SortKey::Dps),
            other => Err(format!(
                "unknown sort key '{other}' (expected name|type|rarity|dps)"
            )),
        }
    }
}

/// One request to the query engine. Empty strings mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub scope: Scope,
    pub type_filter: String,
    pub rarity_filter: String,
    /// Substring matched against the item's infobox rendered as JSON.
    pub stat_filter: String,
    pub sort: Option<SortKey>,
    /// 1-based; 0 is read as 1.
    pub page: usize,
    /// 0 is read as [`DEFAULT_PAGE_SIZE`].
    pub page_size: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: String::new(),
            scope: Scope::All,
            type_filter: String::new(),
            rarity_filter: String::new(),
            stat_filter: String::new(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Query {
    fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

/// A result row with the overlay markers a UI renders next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryHit<'a> {
    pub item: &'a Item,
    pub favorite: bool,
    pub unlocked: bool,
    pub has_note: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<'a> {
    /// Rows on the requested page.
    pub results: Vec<QueryHit<'a>>,
    /// Every matching item in result order, across all pages.
    pub matches: Vec<&'a Item>,
    pub total_count: usize,
    pub page: usize,
    pub page_count: usize,
}

/// Run `query` against `catalog`, marking rows from `overlay`.
pub fn run_query<'a>(catalog: &'a Catalog, overlay: &Overlay, query: &Query) -> QueryResult<'a> {
    let matches = matching_items(catalog, query);
    let total_count = matches.len();
    let page = query.effective_page();
    let page_size = query.effective_page_size();
    let page_count = total_count.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let results = matches
        .iter()
        .skip(start)
        .take(page_size)
        .map(|&item| QueryHit {
            item,
            favorite: overlay.is_favorite(&item.name),
            unlocked: overlay.is_unlocked(&item.name),
            has_note: overlay.note(&item.name).is_some(),
        })
        .collect();

    debug!(total_count, page, page_count, "ran query");
    QueryResult {
        results,
        matches,
        total_count,
        page,
        page_count,
    }
}

/// All items matching `query`'s scope and filters, sorted, unpaginated.
pub fn matching_items<'a>(catalog: &'a Catalog, query: &Query) -> Vec<&'a Item> {
    let base: Vec<&Item> = match &query.scope {
        Scope::All => catalog.items().iter().collect(),
        Scope::Type(item_type) => catalog.items_of_type(item_type).collect(),
    };

    let filter = Filter::new(query);
    let mut matches: Vec<&Item> = base.into_iter().filter(|item| filter.accepts(item)).collect();

    if let Some(key) = query.sort {
        // Vec::sort_by is stable, so ties keep their prior order.
        matches.sort_by(|a, b| compare_on(key, a, b));
    }
    matches
}

fn compare_on(key: SortKey, a: &Item, b: &Item) -> Ordering {
    key.field(a).cmp(key.field(b))
}

/// Normalized filter terms, prepared once per query.
struct Filter<'q> {
    item_type: Option<&'q str>,
    rarity: Option<&'q str>,
    stat: Option<String>,
    text: Option<String>,
}

impl<'q> Filter<'q> {
    fn new(query: &'q Query) -> Self {
        Self {
            item_type: exact(&query.type_filter),
            rarity: exact(&query.rarity_filter),
            stat: trimmed(&query.stat_filter).map(str::to_lowercase),
            text: trimmed(&query.text).map(str::to_lowercase),
        }
    }

    fn accepts(&self, item: &Item) -> bool {
        if let Some(item_type) = self.item_type {
            if item.item_type.as_str() != item_type {
                return false;
            }
        }
        if let Some(rarity) = self.rarity {
            if item.rarity_label() != rarity {
                return false;
            }
        }
        if let Some(stat) = &self.stat {
            let rendered = serde_json::to_string(&item.infobox)
                .unwrap_or_default()
                .to_lowercase();
            if !rendered.contains(stat.as_str()) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !item.search_text().contains(text.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Equality filters compare the label as given; only "" disables them.
fn exact(raw: &str) -> Option<&str> {
    (!raw.is_empty()).then_some(raw)
}

fn trimmed(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
