//! # Permy Gate
//!
//! Runtime capability checks over the permissions discovered by
//! `permy-catalog`.
//!
//! ## Overview
//!
//! The permy-gate crate handles:
//! - **Gate**: `can` / `cannot` checks against a user's grants
//! - **Grants**: `Controller@method` grant sets with controller wildcards
//! - **Directives**: Template conditional tags lowering onto gate checks
//!
//! ## Usage
//!
//! ```rust
//! use permy_gate::{Conditional, Directive, Gate, GrantSet};
//!
//! let grants = GrantSet::from_strings(&["UserController@index", "PostController@*"]);
//!
//! assert!(grants.can("UserController", "index"));
//! assert!(grants.cannot("UserController", "destroy"));
//!
//! let open = Directive::from_tag("permyCan").unwrap();
//! assert_eq!(open.lower(&grants, "PostController", "edit"), Conditional::Open(true));
//! ```
//!
//! Grant storage is left to the host application. Anything implementing
//! [`Gate`] can back the template directives.

pub mod directives;
pub mod grants;

// Re-export main types for convenience
pub use directives::{Conditional, Directive};
pub use grants::{Gate, GrantSet, WILDCARD_METHOD};
