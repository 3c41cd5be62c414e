//! # Routes
//!
//! Route records as reported by the host framework's router, and the
//! `Controller@method` action identifiers they point at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CatalogError, CatalogResult};

/// A controller action identifier, e.g. `UserController@index`.
///
/// # Example
///
/// ```
/// use permy_catalog::routes::ActionId;
///
/// let action = ActionId::parse("UserController@index").unwrap();
/// assert_eq!(action.controller, "UserController");
/// assert_eq!(action.method, "index");
/// assert_eq!(action.to_string(), "UserController@index");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId {
    /// Raw controller identifier, as registered with the router.
    pub controller: String,
    /// Method name on the controller.
    pub method: String,
}

impl ActionId {
    /// Create an action identifier from its parts.
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: method.into(),
        }
    }

    /// Parse from `Controller@method`.
    ///
    /// The identifier is split on the first `@`. Both halves must be non-empty.
    ///
    /// # Errors
    ///
    /// `CatalogError::MalformedAction` if the identifier is not of that form.
    pub fn parse(s: &str) -> CatalogResult<Self> {
        match s.split_once('@') {
            Some((controller, method)) if !controller.is_empty() && !method.is_empty() => {
                Ok(Self::new(controller, method))
            }
            _ => Err(CatalogError::MalformedAction(s.to_string())),
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.method)
    }
}

/// Method whitelist/blacklist attached to a middleware.
///
/// `only` wins over `except` when both are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOptions {
    /// Methods the middleware applies to exclusively.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,
    /// Methods the middleware does not apply to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}

impl FilterOptions {
    /// Options applying to the listed methods only.
    pub fn only<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: methods.into_iter().map(Into::into).collect(),
            except: Vec::new(),
        }
    }

    /// Options applying to every method but the listed ones.
    pub fn except<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: Vec::new(),
            except: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether the middleware applies to `method`.
    ///
    /// # Example
    ///
    /// ```
    /// use permy_catalog::routes::FilterOptions;
    ///
    /// let opts = FilterOptions::only(["edit"]);
    /// assert!(opts.permits("edit"));
    /// assert!(!opts.permits("show"));
    ///
    /// let opts = FilterOptions::except(["destroy"]);
    /// assert!(opts.permits("show"));
    /// assert!(!opts.permits("destroy"));
    /// ```
    pub fn permits(&self, method: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|m| m == method);
        }
        if !self.except.is_empty() {
            return !self.except.iter().any(|m| m == method);
        }
        true
    }
}

/// A registered route.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    /// URI pattern, informational only.
    #[serde(default)]
    pub uri: String,
    /// Controller action, or `None` for closure routes.
    #[serde(default)]
    pub action: Option<String>,
    /// Middleware/filter names applied to the route itself.
    #[serde(default)]
    pub middleware: BTreeSet<String>,
}

impl Route {
    /// Create a route pointing at a controller action.
    pub fn new(uri: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            action: Some(action.into()),
            ..Self::default()
        }
    }

    /// Create a route handled by a closure rather than a controller.
    pub fn closure(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Add a middleware name.
    pub fn middleware(mut self, name: impl Into<String>) -> Self {
        self.middleware.insert(name.into());
        self
    }

    /// Parse the route's controller action.
    ///
    /// Returns `None` for closure routes.
    pub fn action_id(&self) -> Option<CatalogResult<ActionId>> {
        self.action.as_deref().map(ActionId::parse)
    }
}

/// Source of registered routes, in the order the router reports them.
pub trait RouteSource {
    /// Enumerate all registered routes.
    fn routes(&self) -> Vec<Route>;
}

/// Fixed in-memory route table.
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes {
    routes: Vec<Route>,
}

impl StaticRoutes {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Get the count of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<Route> for StaticRoutes {
    fn from_iter<T: IntoIterator<Item = Route>>(iter: T) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl RouteSource for StaticRoutes {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }
}

impl RouteSource for Vec<Route> {
    fn routes(&self) -> Vec<Route> {
        self.clone()
    }
}
