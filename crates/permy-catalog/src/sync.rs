//! # Catalog Synchronization
//!
//! Walks every registered route, keeps the permission-relevant ones, and
//! appends any controller or method missing from the persisted catalog.
//!
//! ## Discovery Pass
//!
//! ```text
//! load catalog (empty if missing)
//!   for each route, in router order:
//!     closure route            -> skip
//!     malformed action         -> skip
//!     not permission-relevant  -> skip
//!     missing controller       -> append, dirty
//!     missing method           -> append, dirty
//! persist once if dirty
//! return entries sorted by controller key
//! ```
//!
//! Entries are never removed, so running the pass twice over the same
//! routes writes at most once.

use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{PermissionCatalog, PermissionEntry};
use crate::config::PermyConfig;
use crate::error::CatalogResult;
use crate::filters::{ControllerIntrospector, FilterMatcher, MiddlewareStrategy};
use crate::labels::{LabelSource, TemplateLabels};
use crate::routes::RouteSource;
use crate::store::{CatalogStore, FileCatalogStore};

/// Maps a raw controller identifier onto its catalog key.
pub trait KeyNormalizer {
    /// Normalize a raw controller identifier.
    fn normalize(&self, controller: &str) -> String;
}

/// Uses the raw controller identifier as the catalog key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl KeyNormalizer for PassThrough {
    fn normalize(&self, controller: &str) -> String {
        controller.to_string()
    }
}

/// Outcome of a discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Controllers appended to the catalog.
    pub added_controllers: usize,
    /// Methods appended to the catalog.
    pub added_methods: usize,
    /// Routes skipped for a malformed action identifier.
    pub skipped_malformed: usize,
    /// Routes skipped as closure routes or not permission-relevant.
    pub skipped_irrelevant: usize,
    /// Whether the catalog was written.
    pub persisted: bool,
}

/// Discovers permission-gated routes and keeps the catalog in sync.
///
/// # Example
///
/// ```
/// use permy_catalog::filters::{FilterMatcher, MiddlewareStrategy};
/// use permy_catalog::labels::TemplateLabels;
/// use permy_catalog::routes::Route;
/// use permy_catalog::store::MemoryCatalogStore;
/// use permy_catalog::sync::CatalogSynchronizer;
///
/// let routes = vec![
///     Route::new("/users", "UserController@index").middleware("permission"),
///     Route::new("/users/{id}", "UserController@destroy"),
/// ];
///
/// let synchronizer = CatalogSynchronizer::new(
///     Box::new(routes),
///     FilterMatcher::new(["permission"], MiddlewareStrategy::RouteOnly),
///     Box::new(TemplateLabels::default()),
///     Box::new(MemoryCatalogStore::new()),
/// );
///
/// let list = synchronizer.get_list().unwrap();
/// let users = &list["UserController"];
/// assert!(users.methods.contains_key("index"));
/// assert!(!users.methods.contains_key("destroy"));
/// ```
pub struct CatalogSynchronizer {
    routes: Box<dyn RouteSource>,
    matcher: FilterMatcher,
    labels: Box<dyn LabelSource>,
    store: Box<dyn CatalogStore>,
    normalizer: Box<dyn KeyNormalizer>,
    strict: bool,
}

impl fmt::Debug for CatalogSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSynchronizer")
            .field("matcher", &self.matcher)
            .field("strict", &self.strict)
            .finish()
    }
}

impl CatalogSynchronizer {
    /// Create a synchronizer with pass-through keys that ignores
    /// persistence failures.
    pub fn new(
        routes: Box<dyn RouteSource>,
        matcher: FilterMatcher,
        labels: Box<dyn LabelSource>,
        store: Box<dyn CatalogStore>,
    ) -> Self {
        Self {
            routes,
            matcher,
            labels,
            store,
            normalizer: Box::new(PassThrough),
            strict: false,
        }
    }

    /// Create a synchronizer from configuration.
    ///
    /// The catalog is stored under the configured language path and locale.
    /// `introspector` is only consulted with the controller-options strategy.
    pub fn from_config(
        config: &PermyConfig,
        routes: Box<dyn RouteSource>,
        introspector: Option<Box<dyn ControllerIntrospector>>,
    ) -> Self {
        let strategy = MiddlewareStrategy::from_mode(config.middleware_strategy, introspector);
        let labels: TemplateLabels = config.labels.clone();

        Self::new(
            routes,
            FilterMatcher::new(config.filters.fillable.iter().cloned(), strategy),
            Box::new(labels),
            Box::new(FileCatalogStore::new(&config.lang_path, &config.locale)),
        )
        .with_strict(config.strict())
    }

    /// Raise persistence failures instead of ignoring them.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the controller key normalizer.
    pub fn with_normalizer(mut self, normalizer: Box<dyn KeyNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Get the catalog of every permission-gated controller and method.
    ///
    /// # Returns
    ///
    /// Catalog entries sorted by controller key
    ///
    /// # Errors
    ///
    /// Store errors when the catalog changed, could not be persisted, and
    /// strict mode is on.
    pub fn get_list(&self) -> CatalogResult<BTreeMap<String, PermissionEntry>> {
        let (catalog, _) = self.scan()?;
        Ok(catalog.into_sorted())
    }

    /// Run a discovery pass and report what it did.
    pub fn sync(&self) -> CatalogResult<SyncReport> {
        let (_, report) = self.scan()?;
        Ok(report)
    }

    #[instrument(skip(self), fields(strict = self.strict))]
    fn scan(&self) -> CatalogResult<(PermissionCatalog, SyncReport)> {
        let mut catalog = self.store.load();
        let mut report = SyncReport::default();

        for route in self.routes.routes() {
            let action = match route.action_id() {
                None => {
                    report.skipped_irrelevant += 1;
                    continue;
                }
                Some(Err(e)) => {
                    debug!(uri = %route.uri, error = %e, "Skipping route");
                    report.skipped_malformed += 1;
                    continue;
                }
                Some(Ok(action)) => action,
            };

            // Introspection resolves the raw controller; the catalog uses the key.
            let key = self.normalizer.normalize(&action.controller);

            if !self.matcher.is_relevant(&route, &action) {
                report.skipped_irrelevant += 1;
                continue;
            }

            if !catalog.contains_controller(&key) {
                catalog.ensure_controller(&key, self.labels.as_ref());
                report.added_controllers += 1;
            }
            if !catalog.contains_method(&key, &action.method) {
                catalog.ensure_method(&key, &action.method, self.labels.as_ref());
                report.added_methods += 1;
            }
        }

        if catalog.is_dirty() {
            report.persisted = self.persist(&catalog)?;
            if report.persisted {
                info!(
                    controllers = report.added_controllers,
                    methods = report.added_methods,
                    "Updated permissions catalog"
                );
            }
        }

        Ok((catalog, report))
    }

    fn persist(&self, catalog: &PermissionCatalog) -> CatalogResult<bool> {
        match self.store.save(catalog) {
            Ok(()) => Ok(true),
            Err(e) if self.strict => Err(e),
            Err(e) => {
                warn!(error = %e, "Ignoring permissions catalog persistence failure");
                Ok(false)
            }
        }
    }
}
