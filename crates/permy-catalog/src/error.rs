//! Error types for permission discovery
//!
//! This module defines the errors that can occur while scanning routes,
//! resolving controller middleware, and persisting the permission catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Permission catalog error types.
///
/// Only the store errors ever reach the caller of a discovery pass. The
/// route and controller errors are recovered locally by the synchronizer.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Route action is not of the form `Controller@method`
    #[error("Malformed action identifier: {0}")]
    MalformedAction(String),

    /// Controller could not be resolved for middleware introspection
    #[error("Controller cannot be resolved: {0}")]
    ControllerUnresolvable(String),

    /// Storage location for the catalog could not be created
    #[error("Failed to create the permissions catalog location {path}: {source}")]
    CatalogStoreCreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Catalog could not be written
    #[error("Failed to update the permissions catalog {path}: {reason}")]
    CatalogStoreWriteFailed {
        /// File that could not be written.
        path: PathBuf,
        /// Why the write failed.
        reason: String,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Check if this error aborts a discovery pass.
    ///
    /// Malformed actions and unresolvable controllers only skip a route.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CatalogError::CatalogStoreCreateFailed { .. }
                | CatalogError::CatalogStoreWriteFailed { .. }
        )
    }

    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::MalformedAction(_) => "MALFORMED_ACTION",
            CatalogError::ControllerUnresolvable(_) => "CONTROLLER_UNRESOLVABLE",
            CatalogError::CatalogStoreCreateFailed { .. } => "CATALOG_STORE_CREATE_FAILED",
            CatalogError::CatalogStoreWriteFailed { .. } => "CATALOG_STORE_WRITE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_fatal() {
        let create = CatalogError::CatalogStoreCreateFailed {
            path: PathBuf::from("/lang/en"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let write = CatalogError::CatalogStoreWriteFailed {
            path: PathBuf::from("/lang/en/permy.json"),
            reason: "disk full".to_string(),
        };

        assert!(create.is_fatal());
        assert!(write.is_fatal());
        assert_eq!(create.error_code(), "CATALOG_STORE_CREATE_FAILED");
        assert_eq!(write.error_code(), "CATALOG_STORE_WRITE_FAILED");
    }

    #[test]
    fn test_route_errors_are_recoverable() {
        assert!(!CatalogError::MalformedAction("index".to_string()).is_fatal());
        assert!(!CatalogError::ControllerUnresolvable("Missing".to_string()).is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = CatalogError::MalformedAction("BareFunctionNoAt".to_string());
        assert_eq!(err.to_string(), "Malformed action identifier: BareFunctionNoAt");
    }
}
