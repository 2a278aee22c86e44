//! Holds the live catalog and swaps it on successful imports.
//!
//! The store never installs a half-built catalog: a load that fails to read
//! or parse leaves the previous catalog in place and hands the error back.

use crate::adapter::build_catalog;
use crate::catalog::index::Catalog;
use crate::error::EngineError;
use crate::source::DatasetSource;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default)]
/// Owner of the currently installed catalog.
pub struct CatalogStore {
    live: Catalog,
    generation: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.live
    }

    /// Number of catalogs installed so far; zero means nothing loaded yet.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the live catalog wholesale.
    pub fn install(&mut self, catalog: Catalog) -> &Catalog {
        self.generation += 1;
        info!(
            items = catalog.len(),
            skipped = catalog.skipped(),
            generation = self.generation,
            "installed catalog"
        );
        self.live = catalog;
        &self.live
    }

    /// Parse dataset text and install it if it is well formed.
    pub fn import_text(&mut self, raw: &str) -> Result<&Catalog, EngineError> {
        match build_catalog(raw) {
            Ok(catalog) => Ok(self.install(catalog)),
            Err(err) => {
                warn!("import rejected, keeping current catalog: {err}");
                Err(err)
            }
        }
    }

    /// Read a dataset from `source` and install it if it is well formed.
    pub fn load(
        &mut self,
        source: &DatasetSource,
        timeout: Duration,
    ) -> Result<&Catalog, EngineError> {
        let raw = source.read_text(timeout).inspect_err(|err| {
            warn!(source = %source, "load failed, keeping current catalog: {err}");
        })?;
        self.import_text(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemName;
    use std::net::TcpListener;
    use std::path::PathBuf;

    #[test]
    fn bad_import_keeps_previous_catalog() {
        let mut store = CatalogStore::new();
        store.import_text(r#"[{"name": "Sword"}]"#).unwrap();
        assert_eq!(store.generation(), 1);

        let err = store.import_text("42").unwrap_err();
        assert!(matches!(err, EngineError::MalformedInput(_)));
        assert_eq!(store.generation(), 1);
        assert!(store.catalog().contains(&ItemName::from("Sword")));
    }

    #[test]
    fn failed_read_keeps_previous_catalog() {
        let mut store = CatalogStore::new();
        store.import_text(r#"[{"name": "Sword"}]"#).unwrap();
        let source = DatasetSource::File(PathBuf::from("/nonexistent/items.json"));
        assert!(store.load(&source, Duration::from_secs(1)).is_err());
        assert_eq!(store.catalog().len(), 1);
    }

    #[test]
    fn successful_import_replaces_wholesale() {
        let mut store = CatalogStore::new();
        store.import_text(r#"[{"name": "Sword"}]"#).unwrap();
        store.import_text(r#"{"x": {"name": "Shield"}}"#).unwrap();
        assert_eq!(store.generation(), 2);
        assert!(!store.catalog().contains(&ItemName::from("Sword")));
        assert!(store.catalog().contains(&ItemName::from("Shield")));
    }

    #[test]
    fn fetch_timeout_keeps_previous_catalog() {
        let mut store = CatalogStore::new();
        store.import_text(r#"[{"name": "Sword"}]"#).unwrap();

        // Connections queue in the backlog and never get a response.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let source = DatasetSource::Url(format!("http://{addr}/items.json"));

        let err = store.load(&source, Duration::from_millis(300)).unwrap_err();
        assert!(
            matches!(err, EngineError::Fetch(ref msg) if msg.contains("timed out")),
            "{err}"
        );
        assert_eq!(store.generation(), 1);
        assert_eq!(store.catalog().len(), 1);
        assert!(store.catalog().contains(&ItemName::from("Sword")));
        drop(listener);
    }
}
