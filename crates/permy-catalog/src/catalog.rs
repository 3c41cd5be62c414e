//! # Permission Catalog
//!
//! The catalog enumerates which permissions exist and how they are
//! displayed. It is keyed by controller, each controller holding its
//! methods:
//!
//! ```text
//! {
//!   "UserController": {
//!     "name": "...", "desc": "...",
//!     "methods": { "index": { "name": "...", "desc": "..." } }
//!   }
//! }
//! ```
//!
//! Entries are only ever added. A dirty flag records whether anything was
//! added since the catalog was loaded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::labels::{Label, LabelSource};

/// Display metadata for a controller method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodEntry {
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    pub desc: String,
}

impl From<Label> for MethodEntry {
    fn from(label: Label) -> Self {
        Self {
            name: label.name,
            desc: label.desc,
        }
    }
}

/// Display metadata for a controller and its methods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionEntry {
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    pub desc: String,
    /// Methods keyed by method name.
    #[serde(default)]
    pub methods: BTreeMap<String, MethodEntry>,
}

impl PermissionEntry {
    /// Create an entry with no methods.
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            methods: BTreeMap::new(),
        }
    }
}

impl From<Label> for PermissionEntry {
    fn from(label: Label) -> Self {
        Self::new(label.name, label.desc)
    }
}

/// Controller-keyed permission catalog.
///
/// # Example
///
/// ```
/// use permy_catalog::catalog::PermissionCatalog;
/// use permy_catalog::labels::TemplateLabels;
///
/// let labels = TemplateLabels::default();
/// let mut catalog = PermissionCatalog::new();
///
/// catalog.ensure_method("UserController", "index", &labels);
/// assert!(catalog.contains_controller("UserController"));
/// assert!(catalog.contains_method("UserController", "index"));
/// assert!(catalog.is_dirty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionCatalog {
    entries: BTreeMap<String, PermissionEntry>,
    #[serde(skip)]
    dirty: bool,
}

impl PermissionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clean catalog from existing entries.
    pub fn from_entries(entries: BTreeMap<String, PermissionEntry>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    /// Check if a controller entry exists.
    pub fn contains_controller(&self, controller: &str) -> bool {
        self.entries.contains_key(controller)
    }

    /// Check if a method entry exists under a controller.
    pub fn contains_method(&self, controller: &str, method: &str) -> bool {
        self.entries
            .get(controller)
            .is_some_and(|entry| entry.methods.contains_key(method))
    }

    /// Get the entry for a controller, creating it with generated labels if absent.
    pub fn ensure_controller(
        &mut self,
        controller: &str,
        labels: &dyn LabelSource,
    ) -> &PermissionEntry {
        Self::controller_entry(&mut self.entries, &mut self.dirty, controller, labels)
    }

    /// Get the entry for a method, creating it (and its controller) if absent.
    pub fn ensure_method(
        &mut self,
        controller: &str,
        method: &str,
        labels: &dyn LabelSource,
    ) -> &MethodEntry {
        let dirty = &mut self.dirty;
        let entry = Self::controller_entry(&mut self.entries, dirty, controller, labels);

        entry.methods.entry(method.to_string()).or_insert_with(|| {
            *dirty = true;
            labels.method_label(controller, method).into()
        })
    }

    fn controller_entry<'a>(
        entries: &'a mut BTreeMap<String, PermissionEntry>,
        dirty: &mut bool,
        controller: &str,
        labels: &dyn LabelSource,
    ) -> &'a mut PermissionEntry {
        entries.entry(controller.to_string()).or_insert_with(|| {
            *dirty = true;
            labels.controller_label(controller).into()
        })
    }

    /// Check whether entries were added since the catalog was loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the catalog as persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Get a controller entry.
    pub fn get(&self, controller: &str) -> Option<&PermissionEntry> {
        self.entries.get(controller)
    }

    /// Get the count of controllers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Controller keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Borrow the entries.
    pub fn entries(&self) -> &BTreeMap<String, PermissionEntry> {
        &self.entries
    }

    /// Consume the catalog, returning entries sorted by controller key.
    pub fn into_sorted(self) -> BTreeMap<String, PermissionEntry> {
        self.entries
    }
}
