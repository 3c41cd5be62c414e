//! Catalog persistence
//!
//! The catalog lives in one JSON document per locale, next to the host's
//! other localization files:
//!
//! ```text
//! <lang_path>/<locale>/permy.json
//! ```
//!
//! A save stages the whole document in a temporary file beside the catalog
//! and renames it into place, so the catalog is replaced atomically.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::catalog::PermissionCatalog;
use crate::error::{CatalogError, CatalogResult};

/// File name of the catalog inside a locale directory.
pub const CATALOG_FILE: &str = "permy.json";

/// Backing store for the permission catalog.
pub trait CatalogStore {
    /// Load the persisted catalog.
    ///
    /// A missing or unreadable catalog loads as empty.
    fn load(&self) -> PermissionCatalog;

    /// Persist the whole catalog.
    fn save(&self, catalog: &PermissionCatalog) -> CatalogResult<()>;
}

impl<T: CatalogStore + ?Sized> CatalogStore for Rc<T> {
    fn load(&self) -> PermissionCatalog {
        (**self).load()
    }

    fn save(&self, catalog: &PermissionCatalog) -> CatalogResult<()> {
        (**self).save(catalog)
    }
}

/// JSON file store for one locale.
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    dir: PathBuf,
}

impl FileCatalogStore {
    /// Create a store for `<lang_path>/<locale>/permy.json`.
    pub fn new(lang_path: impl AsRef<Path>, locale: &str) -> Self {
        Self {
            dir: lang_path.as_ref().join(locale),
        }
    }

    /// Directory holding the catalog.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the catalog file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(CATALOG_FILE)
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self) -> PermissionCatalog {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(
                    path = %path.display(),
                    error = %e,
                    "No permissions catalog, starting empty"
                );
                return PermissionCatalog::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Malformed permissions catalog, starting empty"
                );
                PermissionCatalog::new()
            }
        }
    }

    fn save(&self, catalog: &PermissionCatalog) -> CatalogResult<()> {
        let path = self.path();

        if !path.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| {
                CatalogError::CatalogStoreCreateFailed {
                    path: self.dir.clone(),
                    source,
                }
            })?;
        }

        let write_failed = |reason: String| CatalogError::CatalogStoreWriteFailed {
            path: path.clone(),
            reason,
        };

        let body =
            serde_json::to_string_pretty(catalog).map_err(|e| write_failed(e.to_string()))?;

        // Readers see either the old document or the new one, never a partial write.
        let mut staged =
            NamedTempFile::new_in(&self.dir).map_err(|e| write_failed(e.to_string()))?;
        staged
            .write_all(body.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| write_failed(e.to_string()))?;
        staged
            .persist(&path)
            .map_err(|e| write_failed(e.error.to_string()))?;

        debug!(path = %path.display(), controllers = catalog.len(), "Wrote permissions catalog");
        Ok(())
    }
}

/// In-memory store.
///
/// Keeps the last saved catalog and counts writes.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalog: RefCell<PermissionCatalog>,
    writes: Cell<usize>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a catalog.
    pub fn with_catalog(catalog: PermissionCatalog) -> Self {
        Self {
            catalog: RefCell::new(catalog),
            writes: Cell::new(0),
        }
    }

    /// Number of saves performed.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Snapshot of the stored catalog.
    pub fn snapshot(&self) -> PermissionCatalog {
        self.catalog.borrow().clone()
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> PermissionCatalog {
        let mut catalog = self.catalog.borrow().clone();
        catalog.mark_clean();
        catalog
    }

    fn save(&self, catalog: &PermissionCatalog) -> CatalogResult<()> {
        let mut stored = catalog.clone();
        stored.mark_clean();
        *self.catalog.borrow_mut() = stored;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
