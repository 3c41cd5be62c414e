//! Template conditional directives.
//!
//! Templates guard markup with tag pairs:
//!
//! ```text
//! @permyCan('UserController', 'destroy') ... @endpermyCan
//! @permyCant('UserController', 'destroy') ... @endpermyCant
//! ```
//!
//! `@endpermy` closes either form. The template compiler owns the syntax;
//! this module only maps tag names onto gate checks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grants::Gate;

/// A Permy template directive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Opens a block rendered when the check passes.
    Can,
    /// Closes a `Can` block.
    EndCan,
    /// Opens a block rendered when the check fails.
    Cannot,
    /// Closes a `Cannot` block.
    EndCannot,
    /// Closes either block.
    End,
}

/// What a directive lowers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conditional {
    /// Start of a conditional block; the block renders when `true`.
    Open(bool),
    /// End of a conditional block.
    Close,
}

impl Directive {
    /// Get the tag name used in templates.
    pub fn tag(&self) -> &'static str {
        match self {
            Directive::Can => "permyCan",
            Directive::EndCan => "endpermyCan",
            Directive::Cannot => "permyCant",
            Directive::EndCannot => "endpermyCant",
            Directive::End => "endpermy",
        }
    }

    /// Look up a directive by tag name.
    ///
    /// # Example
    ///
    /// ```
    /// use permy_gate::Directive;
    ///
    /// assert_eq!(Directive::from_tag("permyCan"), Some(Directive::Can));
    /// assert_eq!(Directive::from_tag("can"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().into_iter().find(|d| d.tag() == tag)
    }

    /// Get all directives.
    pub fn all() -> Vec<Directive> {
        vec![
            Directive::Can,
            Directive::EndCan,
            Directive::Cannot,
            Directive::EndCannot,
            Directive::End,
        ]
    }

    /// Check if this directive opens a block.
    pub fn is_open(&self) -> bool {
        matches!(self, Directive::Can | Directive::Cannot)
    }

    /// Lower the directive against a gate.
    ///
    /// Closing tags ignore their arguments.
    ///
    /// # Example
    ///
    /// ```
    /// use permy_gate::{Conditional, Directive, GrantSet};
    ///
    /// let grants = GrantSet::from_strings(&["UserController@index"]);
    /// assert_eq!(
    ///     Directive::Cannot.lower(&grants, "UserController", "index"),
    ///     Conditional::Open(false)
    /// );
    /// assert_eq!(Directive::End.lower(&grants, "", ""), Conditional::Close);
    /// ```
    pub fn lower(&self, gate: &dyn Gate, subject: &str, action: &str) -> Conditional {
        let conditional = match self {
            Directive::Can => Conditional::Open(gate.can(subject, action)),
            Directive::Cannot => Conditional::Open(gate.cannot(subject, action)),
            Directive::EndCan | Directive::EndCannot | Directive::End => Conditional::Close,
        };
        debug!(tag = self.tag(), subject, action, ?conditional, "Lowered directive");
        conditional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grants::GrantSet;

    #[test]
    fn test_tag_roundtrip() {
        for directive in Directive::all() {
            assert_eq!(Directive::from_tag(directive.tag()), Some(directive));
        }
        assert_eq!(Directive::from_tag("endpermycan"), None);
    }

    #[test]
    fn test_open_tags() {
        assert!(Directive::Can.is_open());
        assert!(Directive::Cannot.is_open());
        assert!(!Directive::EndCan.is_open());
        assert!(!Directive::End.is_open());
    }

    #[test]
    fn test_lowering() {
        let grants = GrantSet::from_strings(&["UserController@index"]);

        assert_eq!(
            Directive::Can.lower(&grants, "UserController", "index"),
            Conditional::Open(true)
        );
        assert_eq!(
            Directive::Can.lower(&grants, "UserController", "destroy"),
            Conditional::Open(false)
        );
        assert_eq!(
            Directive::Cannot.lower(&grants, "UserController", "destroy"),
            Conditional::Open(true)
        );
        for close in [Directive::EndCan, Directive::EndCannot, Directive::End] {
            assert_eq!(close.lower(&grants, "UserController", "index"), Conditional::Close);
        }
    }
}
