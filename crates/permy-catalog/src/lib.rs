//! # Permy Catalog
//!
//! This crate discovers which controller actions of a web application are
//! permission-gated and keeps a localized catalog of them up to date.
//!
//! ## Overview
//!
//! The permy-catalog crate handles:
//! - **Routes**: Route records and `Controller@method` action identifiers
//! - **Filters**: Deciding which routes carry permission middleware
//! - **Catalog**: Display names and descriptions keyed by controller and method
//! - **Labels**: Default labels for newly discovered entries
//! - **Store**: Persisting the catalog as one JSON document per locale
//! - **Sync**: The discovery pass tying it all together
//!
//! ## Architecture
//!
//! ```text
//! RouteSource -> CatalogSynchronizer -> (FilterMatcher, LabelSource)
//!                        |
//!                        v
//!               PermissionCatalog -> CatalogStore
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use permy_catalog::{CatalogSynchronizer, PermyConfig, Route};
//!
//! let config = PermyConfig::from_env().unwrap();
//! let routes = vec![
//!     Route::new("/users", "UserController@index").middleware("permy"),
//! ];
//!
//! let synchronizer = CatalogSynchronizer::from_config(&config, Box::new(routes), None);
//! for (controller, entry) in synchronizer.get_list().unwrap() {
//!     println!("{controller}: {}", entry.name);
//! }
//! ```
//!
//! ## Catalog Maintenance
//!
//! Entries are only ever appended. Translators edit names and descriptions
//! in the stored catalog; later passes keep those edits and only add what
//! is missing.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod labels;
pub mod routes;
pub mod store;
pub mod sync;

// Re-export main types for convenience
pub use catalog::{MethodEntry, PermissionCatalog, PermissionEntry};
pub use config::{ConfigError, FilterConfig, PermyConfig};
pub use error::{CatalogError, CatalogResult};
pub use filters::{
    ControllerIntrospector, ControllerMiddleware, FilterMatcher, MiddlewareMode, MiddlewareStrategy,
    StaticControllers,
};
pub use labels::{Label, LabelSource, TemplateLabels};
pub use routes::{ActionId, FilterOptions, Route, RouteSource, StaticRoutes};
pub use store::{CatalogStore, FileCatalogStore, MemoryCatalogStore};
pub use sync::{CatalogSynchronizer, KeyNormalizer, PassThrough, SyncReport};
