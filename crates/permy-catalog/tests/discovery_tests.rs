//! End-to-end tests for permission discovery against an on-disk catalog.
//!
//! Each test builds a synchronizer from configuration the way a host
//! application would, pointing the language path at a temporary directory.

use permy_catalog::{
    CatalogSynchronizer, ControllerMiddleware, FileCatalogStore, FilterOptions, MiddlewareMode,
    PermyConfig, Route, StaticControllers,
};
use std::fs;
use std::path::Path;

/// Configuration rooted at a temporary language directory.
fn config(lang_path: &Path) -> PermyConfig {
    let mut config = PermyConfig::default();
    config.filters.fillable = vec!["permission".to_string()];
    config.lang_path = lang_path.to_path_buf();
    config.debug = true;
    config
}

/// Routes of a small admin area.
fn routes() -> Vec<Route> {
    vec![
        Route::new("/users", "UserController@index").middleware("permission"),
        Route::new("/users/{id}", "UserController@destroy"),
        Route::new("/posts/{id}/edit", "PostController@edit"),
        Route::new("/posts/{id}", "PostController@show"),
        Route::new("/bare", "BareFunctionNoAt").middleware("permission"),
        Route::closure("/health"),
    ]
}

fn controllers() -> StaticControllers {
    StaticControllers::new().with(
        "PostController",
        [ControllerMiddleware::with_options("permission", FilterOptions::only(["edit"]))],
    )
}

fn synchronizer(config: &PermyConfig) -> CatalogSynchronizer {
    CatalogSynchronizer::from_config(config, Box::new(routes()), Some(Box::new(controllers())))
}

#[test]
fn test_first_pass_creates_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(&tmp.path().join("lang"));
    let store = FileCatalogStore::new(&config.lang_path, &config.locale);
    assert!(!store.path().exists());

    let report = synchronizer(&config).sync().unwrap();
    assert!(report.persisted);
    assert_eq!(report.added_controllers, 2);
    assert_eq!(report.added_methods, 2);
    assert_eq!(report.skipped_malformed, 1);
    assert!(store.path().exists());

    let contents = fs::read_to_string(store.path()).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(stored["UserController"]["desc"], "UserController permissions");
    assert!(stored["UserController"]["methods"]["index"].is_object());
    assert!(stored["UserController"]["methods"].get("destroy").is_none());
    assert!(stored["PostController"]["methods"]["edit"].is_object());
    assert!(stored["PostController"]["methods"].get("show").is_none());
}

#[test]
fn test_second_pass_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let sync = synchronizer(&config);

    let first = sync.get_list().unwrap();
    let report = sync.sync().unwrap();
    let second = sync.get_list().unwrap();

    assert!(!report.persisted);
    assert_eq!(report.added_controllers + report.added_methods, 0);
    assert_eq!(first, second);
}

#[test]
fn test_translated_entries_survive() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let store = FileCatalogStore::new(&config.lang_path, &config.locale);
    fs::create_dir_all(store.dir()).unwrap();
    fs::write(
        store.path(),
        r#"{
            "UserController": {
                "name": "Utilisateurs",
                "desc": "Gestion des utilisateurs",
                "methods": {"index": {"name": "Lister", "desc": "Voir les utilisateurs"}}
            },
            "ArchivedController": {"name": "Archive", "desc": "Old section"}
        }"#,
    )
    .unwrap();

    let list = synchronizer(&config).get_list().unwrap();

    assert_eq!(list["UserController"].name, "Utilisateurs");
    assert_eq!(list["UserController"].methods["index"].name, "Lister");
    assert!(list.contains_key("ArchivedController"));
    let keys: Vec<&String> = list.keys().collect();
    assert_eq!(keys, vec!["ArchivedController", "PostController", "UserController"]);
}

#[test]
fn test_route_only_strategy_ignores_controllers() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config(tmp.path());
    config.middleware_strategy = MiddlewareMode::RouteOnly;

    let list = synchronizer(&config).get_list().unwrap();
    assert!(list.contains_key("UserController"));
    assert!(!list.contains_key("PostController"));
}

#[test]
fn test_unmatched_filters_produce_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config(tmp.path());
    config.filters.fillable = vec!["acl".to_string()];
    let store = FileCatalogStore::new(&config.lang_path, &config.locale);

    let list = synchronizer(&config).get_list().unwrap();
    assert!(list.is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_strict_mode_surfaces_write_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let store = FileCatalogStore::new(&config.lang_path, &config.locale);
    fs::create_dir_all(store.path()).unwrap();

    let err = synchronizer(&config).get_list().unwrap_err();
    assert_eq!(err.error_code(), "CATALOG_STORE_WRITE_FAILED");

    let lenient = PermyConfig {
        debug: false,
        ..config
    };
    assert_eq!(synchronizer(&lenient).get_list().unwrap().len(), 2);
}
