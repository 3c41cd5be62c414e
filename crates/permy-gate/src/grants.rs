//! # Grants
//!
//! The runtime side of Permy: checking whether the current user may run a
//! controller action. Grants are stored as controller/method pairs, written
//! `Controller@method` in configuration. `Controller@*` grants every method
//! of a controller.

use permy_catalog::ActionId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grant covering every method of a controller.
pub const WILDCARD_METHOD: &str = "*";

/// Answers capability checks for templates and handlers.
///
/// Implementations must be pure: the same grants and arguments always give
/// the same answer, and checking never fails.
pub trait Gate {
    /// Check if `action` may be performed on `subject` (a controller key).
    fn can(&self, subject: &str, action: &str) -> bool;

    /// Negation of [`can`](Gate::can).
    fn cannot(&self, subject: &str, action: &str) -> bool {
        !self.can(subject, action)
    }

    /// Check if any of the actions may be performed.
    fn can_any(&self, subject: &str, actions: &[&str]) -> bool {
        actions.iter().any(|action| self.can(subject, action))
    }

    /// Check if all of the actions may be performed.
    fn can_all(&self, subject: &str, actions: &[&str]) -> bool {
        actions.iter().all(|action| self.can(subject, action))
    }
}

impl<G: Gate + ?Sized> Gate for &G {
    fn can(&self, subject: &str, action: &str) -> bool {
        (**self).can(subject, action)
    }
}

/// A set of granted controller actions.
///
/// # Example
///
/// ```
/// use permy_gate::{Gate, GrantSet};
///
/// let mut grants = GrantSet::new();
/// grants.grant("UserController", "index");
/// grants.grant("PostController", "*");
///
/// assert!(grants.can("UserController", "index"));
/// assert!(grants.cannot("UserController", "destroy"));
/// assert!(grants.can("PostController", "destroy"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrantSet {
    grants: HashSet<ActionId>,
}

impl GrantSet {
    /// Create a new empty grant set.
    pub fn new() -> Self {
        Self {
            grants: HashSet::new(),
        }
    }

    /// Grant an action on a controller. Use `*` as the method to grant them all.
    pub fn grant(&mut self, subject: &str, action: &str) {
        self.grants.insert(ActionId::new(subject, action));
    }

    /// Revoke an action.
    ///
    /// # Returns
    ///
    /// `true` if the grant was present, `false` otherwise
    pub fn revoke(&mut self, subject: &str, action: &str) -> bool {
        self.grants.remove(&ActionId::new(subject, action))
    }

    /// Check for an exact grant or a controller wildcard.
    pub fn has(&self, action: &ActionId) -> bool {
        self.grants.contains(action)
            || self
                .grants
                .contains(&ActionId::new(action.controller.as_str(), WILDCARD_METHOD))
    }

    /// Merge another grant set into this one.
    pub fn merge(&mut self, other: &GrantSet) {
        for grant in &other.grants {
            self.grants.insert(grant.clone());
        }
    }

    /// Create from `Controller@method` strings, skipping malformed ones.
    ///
    /// # Example
    ///
    /// ```
    /// use permy_gate::GrantSet;
    ///
    /// let grants = GrantSet::from_strings(&["UserController@index", "garbage"]);
    /// assert_eq!(grants.len(), 1);
    /// ```
    pub fn from_strings(grants: &[&str]) -> Self {
        grants
            .iter()
            .filter_map(|s| ActionId::parse(s).ok())
            .collect()
    }

    /// Get the count of grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl FromIterator<ActionId> for GrantSet {
    fn from_iter<T: IntoIterator<Item = ActionId>>(iter: T) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}

impl Gate for GrantSet {
    fn can(&self, subject: &str, action: &str) -> bool {
        self.has(&ActionId::new(subject, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_grant() {
        let mut grants = GrantSet::new();
        grants.grant("UserController", "index");

        assert!(grants.can("UserController", "index"));
        assert!(!grants.can("UserController", "edit"));
        assert!(!grants.can("PostController", "index"));
    }

    #[test]
    fn test_cannot_is_negation() {
        let grants = GrantSet::from_strings(&["UserController@index"]);
        for (subject, action) in [("UserController", "index"), ("UserController", "edit")] {
            assert_eq!(grants.cannot(subject, action), !grants.can(subject, action));
        }
    }

    #[test]
    fn test_wildcard_grant() {
        let grants = GrantSet::from_strings(&["PostController@*"]);
        assert!(grants.can("PostController", "edit"));
        assert!(grants.can("PostController", "destroy"));
        assert!(!grants.can("UserController", "edit"));
    }

    #[test]
    fn test_subject_and_action_do_not_bleed() {
        let mut grants = GrantSet::new();
        grants.grant("Admin@Users", "index");

        assert!(grants.can("Admin@Users", "index"));
        assert!(!grants.can("Admin", "Users@index"));

        grants.grant("Reports", "export@*");
        assert!(!grants.can("Reports@export", "*"));
        assert!(!grants.can("Reports@export", "pdf"));
    }

    #[test]
    fn test_revoke() {
        let mut grants = GrantSet::from_strings(&["UserController@index"]);
        assert!(grants.revoke("UserController", "index"));
        assert!(!grants.revoke("UserController", "index"));
        assert!(grants.is_empty());
        assert!(grants.cannot("UserController", "index"));
    }

    #[test]
    fn test_merge() {
        let mut admin = GrantSet::from_strings(&["UserController@index"]);
        let editor = GrantSet::from_strings(&["PostController@edit"]);

        admin.merge(&editor);
        assert_eq!(admin.len(), 2);
        assert!(admin.can("PostController", "edit"));
    }

    #[test]
    fn test_any_and_all() {
        let grants = GrantSet::from_strings(&["UserController@index", "UserController@show"]);

        assert!(grants.can_any("UserController", &["destroy", "show"]));
        assert!(!grants.can_all("UserController", &["destroy", "show"]));
        assert!(grants.can_all("UserController", &["index", "show"]));
        assert!(!grants.can_any("UserController", &[]));
        assert!(grants.can_all("UserController", &[]));
    }

    #[test]
    fn test_gate_through_reference() {
        fn check(gate: impl Gate) -> bool {
            gate.can("UserController", "index")
        }

        let grants = GrantSet::from_strings(&["UserController@index"]);
        assert!(check(&grants));
    }
}
