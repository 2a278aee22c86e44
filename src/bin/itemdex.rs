//! Terminal front end for the item catalog engine.
//!
//! Loads the dataset named by `--data` (or `ITEMDEX_DATASET`), restores the
//! overlay from `--state-dir` (or `ITEMDEX_STATE_DIR`), runs one command, and
//! prints the result. Logs go to stderr under `RUST_LOG`; stdout carries only
//! command output.

use anyhow::{Context, Result, anyhow, bail};
use itemdex::{
    CatalogStore, CompareOutcome, Config, DatasetSource, DirStorage, EngineError, Item,
    ItemName, ItemType, OverlayStore, Query, QueryHit, Scope, SortKey, compare_view,
    export_artifact, favorite_items, item_detail, matching_items, run_query, unlock_tracker,
};
use rand::thread_rng;
use serde_json::json;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse(env::args_os().skip(1))?;
    let mut config = Config::from_env();
    if let Some(data) = &cli.data {
        config.dataset = DatasetSource::parse(data);
    }
    if let Some(dir) = &cli.state_dir {
        config.state_dir = dir.clone();
    }

    match &cli.command {
        Command::Types => {
            let store = load_catalog(&config)?;
            for item_type in store.catalog().types() {
                println!("{item_type}");
            }
        }
        Command::Query(args) => {
            let store = load_catalog(&config)?;
            let overlay = open_overlay(&config)?;
            let query = args.to_query(config.page_size);
            let result = run_query(store.catalog(), overlay.overlay(), &query);
            if args.json {
                let payload = json!({
                    "results": result.results,
                    "total_count": result.total_count,
                    "page": result.page,
                    "page_count": result.page_count,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else if result.results.is_empty() {
                println!("No items match your query.");
            } else {
                for hit in &result.results {
                    println!("{}", render_hit(hit));
                }
                println!(
                    "-- page {}/{} ({} items)",
                    result.page,
                    result.page_count.max(1),
                    result.total_count
                );
            }
        }
        Command::Show(name) => {
            let store = load_catalog(&config)?;
            let overlay = open_overlay(&config)?;
            match item_detail(store.catalog(), overlay.overlay(), &ItemName::from(name.as_str())) {
                Ok(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
                Err(EngineError::NotFound(missing)) => {
                    eprintln!("no item named '{missing}' in the current catalog");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Random => {
            let store = load_catalog(&config)?;
            let item = store
                .catalog()
                .random_item(&mut thread_rng())
                .ok_or_else(|| anyhow!("catalog is empty"))?;
            println!("{}", item.name);
        }
        Command::Favorites => {
            let store = load_catalog(&config)?;
            let overlay = open_overlay(&config)?;
            for item in favorite_items(store.catalog(), overlay.overlay()) {
                println!("{}", item.name);
            }
        }
        Command::Unlocked => {
            let overlay = open_overlay(&config)?;
            for name in unlock_tracker(overlay.overlay()) {
                println!("{name}");
            }
        }
        Command::Favorite(name) => {
            let mut overlay = open_overlay(&config)?;
            let now = overlay.toggle_favorite(name.as_str())?;
            println!("{name}: {}", if now { "favorited" } else { "unfavorited" });
        }
        Command::Unlock(name) => {
            let mut overlay = open_overlay(&config)?;
            let now = overlay.toggle_unlock(name.as_str())?;
            println!("{name}: {}", if now { "unlocked" } else { "locked" });
        }
        Command::Note { name, text } => {
            let mut overlay = open_overlay(&config)?;
            overlay.set_note(name.as_str(), text.as_str())?;
            println!("{name}: note saved");
        }
        Command::Clear => {
            let mut overlay = open_overlay(&config)?;
            overlay.clear_all()?;
            println!("cleared favorites, unlocks, and notes");
        }
        Command::Compare(names) => {
            let store = load_catalog(&config)?;
            let mut overlay = open_overlay(&config)?;
            for name in names {
                if overlay.toggle_compare(name.as_str()) == CompareOutcome::Saturated {
                    eprintln!("compare selection is full; skipped '{name}'");
                }
            }
            print_compare(compare_view(store.catalog(), overlay.overlay()));
        }
        Command::Export { query, out } => {
            let store = load_catalog(&config)?;
            let matches = matching_items(store.catalog(), &query.to_query(config.page_size));
            let artifact = export_artifact(matches.iter().copied())?;
            let path = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(artifact.file_name));
            fs::write(&path, &artifact.contents)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(items = matches.len(), path = %path.display(), "exported items");
            println!("wrote {} items to {}", matches.len(), path.display());
        }
    }
    Ok(())
}

fn load_catalog(config: &Config) -> Result<CatalogStore> {
    let mut store = CatalogStore::new();
    store
        .load(&config.dataset, config.fetch_timeout)
        .with_context(|| format!("loading dataset from {}", config.dataset))?;
    Ok(store)
}

fn open_overlay(config: &Config) -> Result<OverlayStore<DirStorage>> {
    let storage = DirStorage::open(&config.state_dir)
        .with_context(|| format!("opening state dir {}", config.state_dir.display()))?;
    Ok(OverlayStore::restore(storage))
}

fn render_hit(hit: &QueryHit<'_>) -> String {
    let marks = format!(
        "{}{}{}",
        if hit.favorite { '*' } else { ' ' },
        if hit.unlocked { 'U' } else { ' ' },
        if hit.has_note { 'N' } else { ' ' },
    );
    format!(
        "{marks} {} [{}] {}",
        hit.item.name,
        hit.item.item_type,
        hit.item.rarity_label()
    )
}

fn print_compare(items: Vec<&Item>) {
    if items.is_empty() {
        println!("Nothing selected for comparison.");
        return;
    }
    for item in items {
        println!("== {} [{}]", item.name, item.item_type);
        for (key, value) in &item.infobox {
            println!("  {key}: {value}");
        }
        if !item.long_description.is_empty() {
            println!("  {}", item.long_description);
        }
    }
}

struct Cli {
    data: Option<String>,
    state_dir: Option<PathBuf>,
    command: Command,
}

enum Command {
    Types,
    Query(QueryArgs),
    Show(String),
    Random,
    Favorites,
    Unlocked,
    Favorite(String),
    Unlock(String),
    Note { name: String, text: String },
    Clear,
    Compare(Vec<String>),
    Export { query: QueryArgs, out: Option<PathBuf> },
}

#[derive(Default)]
struct QueryArgs {
    search: String,
    scope: Option<String>,
    item_type: String,
    rarity: String,
    stat: String,
    sort: Option<SortKey>,
    page: Option<usize>,
    page_size: Option<usize>,
    json: bool,
}

impl QueryArgs {
    fn to_query(&self, default_page_size: usize) -> Query {
        Query {
            text: self.search.clone(),
            scope: self
                .scope
                .as_deref()
                .map(|label| Scope::Type(ItemType::new(label)))
                .unwrap_or_default(),
            type_filter: self.item_type.clone(),
            rarity_filter: self.rarity.clone(),
            stat_filter: self.stat.clone(),
            sort: self.sort,
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
        }
    }
}

impl Cli {
    fn parse(raw_args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut args = Vec::new();
        for arg in raw_args {
            args.push(
                arg.into_string()
                    .map_err(|_| anyhow!("argument is not valid UTF-8"))?,
            );
        }
        let mut args = args.into_iter();

        let mut data = None;
        let mut state_dir = None;
        let mut command_name = None;
        let mut rest = Vec::new();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" if command_name.is_none() => {
                    data = Some(next_value(&mut args, "--data")?);
                }
                "--state-dir" if command_name.is_none() => {
                    state_dir = Some(PathBuf::from(next_value(&mut args, "--state-dir")?));
                }
                "--help" | "-h" if command_name.is_none() => usage(0),
                _ if command_name.is_none() => command_name = Some(arg),
                _ => rest.push(arg),
            }
        }

        let Some(command_name) = command_name else {
            usage(1);
        };
        let command = parse_command(&command_name, rest)?;
        Ok(Self {
            data,
            state_dir,
            command,
        })
    }
}

fn parse_command(name: &str, rest: Vec<String>) -> Result<Command> {
    let command = match name {
        "types" => no_args(name, rest, Command::Types)?,
        "random" => no_args(name, rest, Command::Random)?,
        "favorites" => no_args(name, rest, Command::Favorites)?,
        "unlocked" => no_args(name, rest, Command::Unlocked)?,
        "clear" => no_args(name, rest, Command::Clear)?,
        "show" => Command::Show(single_name(name, rest)?),
        "fav" => Command::Favorite(single_name(name, rest)?),
        "unlock" => Command::Unlock(single_name(name, rest)?),
        "note" => {
            let mut rest = rest.into_iter();
            let item = rest
                .next()
                .ok_or_else(|| anyhow!("note requires NAME and TEXT"))?;
            let text = rest.collect::<Vec<_>>().join(" ");
            Command::Note { name: item, text }
        }
        "compare" => {
            if rest.is_empty() {
                bail!("compare requires at least one NAME");
            }
            Command::Compare(rest)
        }
        "query" => {
            let (query, _) = parse_query_args(rest, false)?;
            Command::Query(query)
        }
        "export" => {
            let (query, out) = parse_query_args(rest, true)?;
            Command::Export { query, out }
        }
        other => bail!("unknown command: {other} (see --help)"),
    };
    Ok(command)
}

fn no_args(name: &str, rest: Vec<String>, command: Command) -> Result<Command> {
    if let Some(extra) = rest.first() {
        bail!("{name} takes no arguments, got '{extra}'");
    }
    Ok(command)
}

fn single_name(command: &str, rest: Vec<String>) -> Result<String> {
    let name = rest.join(" ");
    if name.trim().is_empty() {
        bail!("{command} requires an item NAME");
    }
    Ok(name)
}

fn parse_query_args(rest: Vec<String>, allow_out: bool) -> Result<(QueryArgs, Option<PathBuf>)> {
    let mut query = QueryArgs::default();
    let mut out = None;
    let mut args = rest.into_iter();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--search" => query.search = next_value(&mut args, "--search")?,
            "--scope" => query.scope = Some(next_value(&mut args, "--scope")?),
            "--type" => query.item_type = next_value(&mut args, "--type")?,
            "--rarity" => query.rarity = next_value(&mut args, "--rarity")?,
            "--stat" => query.stat = next_value(&mut args, "--stat")?,
            "--sort" => {
                let raw = next_value(&mut args, "--sort")?;
                query.sort = Some(raw.parse::<SortKey>().map_err(|msg| anyhow!(msg))?);
            }
            "--page" | "--page-size" | "--json" if allow_out => {
                bail!("export writes every match; {flag} is not accepted")
            }
            "--page" => query.page = Some(parse_count(&mut args, "--page")?),
            "--page-size" => query.page_size = Some(parse_count(&mut args, "--page-size")?),
            "--json" => query.json = true,
            "--out" if allow_out => out = Some(PathBuf::from(next_value(&mut args, "--out")?)),
            other => bail!("unknown flag: {other}"),
        }
    }
    Ok((query, out))
}

fn parse_count(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<usize> {
    let raw = next_value(args, flag)?;
    raw.parse::<usize>()
        .with_context(|| format!("{flag} expects a non-negative integer, got '{raw}'"))
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: itemdex [--data PATH|URL|-] [--state-dir DIR] <command> [args]\n\n\
Commands:\n  \
query [--search TEXT] [--scope TYPE] [--type TYPE] [--rarity R] [--stat TEXT]\n        \
[--sort name|type|rarity|dps] [--page N] [--page-size N] [--json]\n  \
export [filter flags] [--out PATH]  Write matching items (default filtered_items.json).\n  \
types                               List item types.\n  \
show NAME                           Print one item's detail view.\n  \
random                              Print a random item name.\n  \
favorites | unlocked                List favorites / unlocked names.\n  \
fav NAME | unlock NAME              Toggle favorite / unlocked.\n  \
note NAME TEXT                      Save a note (empty TEXT keeps an empty note).\n  \
clear                               Remove all favorites, unlocks, and notes.\n  \
compare NAME...                     Compare up to three items.\n\n\
Environment: ITEMDEX_DATASET, ITEMDEX_STATE_DIR, ITEMDEX_PAGE_SIZE,\n\
ITEMDEX_FETCH_TIMEOUT_SECS, RUST_LOG."
    );
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::parse(args.iter().map(OsString::from))
    }

    #[test]
    fn global_flags_precede_command() {
        let cli = parse(&["--data", "items.json", "--state-dir", "/tmp/s", "types"]).unwrap();
        assert_eq!(cli.data.as_deref(), Some("items.json"));
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/s")));
        assert!(matches!(cli.command, Command::Types));
    }

    #[test]
    fn query_flags_build_query() {
        let cli = parse(&[
            "query",
            "--search",
            "swo",
            "--sort",
            "name",
            "--page-size",
            "5",
        ])
        .unwrap();
        let Command::Query(args) = cli.command else {
            panic!("expected query command");
        };
        let query = args.to_query(20);
        assert_eq!(query.text, "swo");
        assert_eq!(query.sort, Some(SortKey::Name));
        assert_eq!(query.page_size, 5);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn export_accepts_filters_and_out() {
        let cli = parse(&["export", "--type", "Armor", "--out", "armor.json"]).unwrap();
        let Command::Export { query, out } = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(query.item_type, "Armor");
        assert_eq!(out, Some(PathBuf::from("armor.json")));
    }

    #[test]
    fn multi_word_names_are_joined() {
        let cli = parse(&["fav", "Arc", "Blade"]).unwrap();
        assert!(matches!(cli.command, Command::Favorite(ref name) if name == "Arc Blade"));
    }

    #[test]
    fn rejects_unknown_sort_and_flags() {
        assert!(parse(&["query", "--sort", "price"]).is_err());
        assert!(parse(&["query", "--out", "x.json"]).is_err());
        assert!(parse(&["export", "--json"]).is_err());
        assert!(parse(&["export", "--page", "2"]).is_err());
        assert!(parse(&["export", "--page-size", "5", "--out", "x.json"]).is_err());
        assert!(parse(&["types", "extra"]).is_err());
    }
}
