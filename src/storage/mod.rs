use std::fs;
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::engine::Record;
use crate::error::DbResult;

/// File-backed persistence: the catalog lives in `metadata.json` and
/// each table's rows in `<table>.json` under one data directory. Every
/// save is a full-file overwrite; there is no locking and no guard
/// against concurrent external modification.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Storage { root: root.into() }
    }

    fn metadata_path(&self) -> PathBuf {
        self.root.join("metadata.json")
    }

    fn rows_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.json"))
    }

    /// A missing metadata file is an empty catalog, not an error.
    pub fn load_catalog(&self) -> DbResult<Catalog> {
        let path = self.metadata_path();
        if !path.exists() {
            return Ok(Catalog::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_catalog(&self, catalog: &Catalog) -> DbResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.metadata_path(), serde_json::to_string_pretty(catalog)?)?;
        Ok(())
    }

    /// A missing rows file is an empty collection, not an error.
    pub fn load_rows(&self, table: &str) -> DbResult<Vec<Record>> {
        let path = self.rows_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_rows(&self, table: &str, rows: &[Record]) -> DbResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.rows_path(table), serde_json::to_string_pretty(rows)?)?;
        Ok(())
    }
}
