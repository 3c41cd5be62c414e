//! # Filters
//!
//! Decides whether a route is permission-relevant by intersecting the
//! middleware applied to it with the configured allow-list.
//!
//! Two tiers are checked, short-circuiting on the first hit:
//!
//! ```text
//! route middleware ∩ allowed ≠ ∅                      -> relevant
//! first allowed controller middleware permits method  -> relevant
//! otherwise                                           -> not relevant
//! ```
//!
//! Some hosts only expose middleware on the route, others declare it on
//! the controller with `only`/`except` options. The tier set is chosen once
//! through [`MiddlewareStrategy`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::routes::{ActionId, FilterOptions, Route};

/// Middleware a controller declares for its own methods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerMiddleware {
    /// Middleware/filter name.
    pub name: String,
    /// Methods the middleware is restricted to or excluded from.
    #[serde(default)]
    pub options: FilterOptions,
}

impl ControllerMiddleware {
    /// Middleware applying to every method of the controller.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: FilterOptions::default(),
        }
    }

    /// Middleware with `only`/`except` options.
    pub fn with_options(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// Resolves the middleware a controller declares.
pub trait ControllerIntrospector {
    /// Get the controller's middleware in declaration order.
    ///
    /// # Errors
    ///
    /// `CatalogError::ControllerUnresolvable` if the controller cannot be
    /// resolved.
    fn controller_middleware(&self, controller: &str) -> CatalogResult<Vec<ControllerMiddleware>>;
}

/// Registry of controllers and their declared middleware.
#[derive(Debug, Clone, Default)]
pub struct StaticControllers {
    controllers: HashMap<String, Vec<ControllerMiddleware>>,
}

impl StaticControllers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller with its middleware, replacing any previous entry.
    pub fn register<I>(&mut self, controller: impl Into<String>, middleware: I)
    where
        I: IntoIterator<Item = ControllerMiddleware>,
    {
        self.controllers
            .insert(controller.into(), middleware.into_iter().collect());
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<I>(mut self, controller: impl Into<String>, middleware: I) -> Self
    where
        I: IntoIterator<Item = ControllerMiddleware>,
    {
        self.register(controller, middleware);
        self
    }
}

impl ControllerIntrospector for StaticControllers {
    fn controller_middleware(&self, controller: &str) -> CatalogResult<Vec<ControllerMiddleware>> {
        self.controllers
            .get(controller)
            .cloned()
            .ok_or_else(|| CatalogError::ControllerUnresolvable(controller.to_string()))
    }
}

/// Where middleware is looked up.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MiddlewareMode {
    /// Route-level middleware only.
    RouteOnly,
    /// Route-level middleware, then controller-declared middleware with options.
    #[default]
    ControllerOptions,
}

impl MiddlewareMode {
    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "route" | "route_only" => Some(MiddlewareMode::RouteOnly),
            "controller" | "controller_options" => Some(MiddlewareMode::ControllerOptions),
            _ => None,
        }
    }
}

/// Middleware lookup strategy, chosen once at startup.
pub enum MiddlewareStrategy {
    /// Only the route's own middleware is consulted.
    RouteOnly,
    /// Route middleware first, then the controller's declared middleware.
    ControllerOptions(Box<dyn ControllerIntrospector>),
}

impl MiddlewareStrategy {
    /// Build the strategy for a configured mode.
    ///
    /// `ControllerOptions` without an introspector degrades to `RouteOnly`.
    pub fn from_mode(
        mode: MiddlewareMode,
        introspector: Option<Box<dyn ControllerIntrospector>>,
    ) -> Self {
        match (mode, introspector) {
            (MiddlewareMode::ControllerOptions, Some(introspector)) => {
                MiddlewareStrategy::ControllerOptions(introspector)
            }
            (MiddlewareMode::ControllerOptions, None) => {
                debug!("No controller introspector supplied, checking route middleware only");
                MiddlewareStrategy::RouteOnly
            }
            (MiddlewareMode::RouteOnly, _) => MiddlewareStrategy::RouteOnly,
        }
    }

    /// Get the mode this strategy implements.
    pub fn mode(&self) -> MiddlewareMode {
        match self {
            MiddlewareStrategy::RouteOnly => MiddlewareMode::RouteOnly,
            MiddlewareStrategy::ControllerOptions(_) => MiddlewareMode::ControllerOptions,
        }
    }
}

impl fmt::Debug for MiddlewareStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MiddlewareStrategy").field(&self.mode()).finish()
    }
}

/// Decides which routes carry permission-relevant middleware.
#[derive(Debug)]
pub struct FilterMatcher {
    allowed: BTreeSet<String>,
    strategy: MiddlewareStrategy,
}

impl FilterMatcher {
    /// Create a matcher for the given allow-list.
    pub fn new<I, S>(allowed: I, strategy: MiddlewareStrategy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            strategy,
        }
    }

    /// Middleware names considered permission-relevant.
    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    /// Check whether a route is permission-relevant.
    ///
    /// # Arguments
    ///
    /// * `route` - The route being scanned
    /// * `action` - The route's parsed controller action
    pub fn is_relevant(&self, route: &Route, action: &ActionId) -> bool {
        if self.matches_route(route) {
            return true;
        }

        match &self.strategy {
            MiddlewareStrategy::RouteOnly => false,
            MiddlewareStrategy::ControllerOptions(introspector) => {
                self.matches_controller(introspector.as_ref(), action)
            }
        }
    }

    fn matches_route(&self, route: &Route) -> bool {
        !route.middleware.is_disjoint(&self.allowed)
    }

    fn matches_controller(
        &self,
        introspector: &dyn ControllerIntrospector,
        action: &ActionId,
    ) -> bool {
        let middleware = match introspector.controller_middleware(&action.controller) {
            Ok(middleware) => middleware,
            Err(e) => {
                debug!(
                    controller = %action.controller,
                    error = %e,
                    "Skipping controller middleware"
                );
                return false;
            }
        };

        // First allowed entry decides, later entries are not consulted.
        middleware
            .iter()
            .find(|m| self.allowed.contains(&m.name))
            .map_or(false, |m| m.options.permits(&action.method))
    }
}
