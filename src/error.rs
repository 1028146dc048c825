//! Error types for the migration planner
//!
//! Provides structured error types for all client components including
//! inventory queries, VM resolution, mapping synthesis, and plan creation.

use thiserror::Error;

/// Unified error type for the planner
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Resource already exists: {kind}/{name}")]
    AlreadyExists { kind: String, name: String },

    #[error("Resource not found: {kind} {namespace}/{name}")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("No default openshift provider found in namespace {namespace}")]
    NoDefaultProvider { namespace: String },

    #[error("Failed to create {kind}: {source}")]
    Create {
        kind: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to patch {kind}/{name}: {source}")]
    Patch {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation failed: {0}")]
    Validation(String),

    // =========================================================================
    // Inventory Errors
    // =========================================================================
    #[error("Inventory request error: {0}")]
    InventoryConnection(#[from] reqwest::Error),

    #[error("Inventory fetch failed: {0}")]
    InventoryFetch(String),

    // =========================================================================
    // Conversion Errors
    // =========================================================================
    #[error("Object conversion error: {0}")]
    Conversion(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is a fatal pre-condition failure as opposed to a
    /// transient API/network problem. Fatal errors should not be retried
    /// with the same arguments.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::AlreadyExists { .. }
                | Error::NotFound { .. }
                | Error::NoDefaultProvider { .. }
                | Error::Validation(_)
                | Error::Configuration(_)
        )
    }

    /// Check if this error is transient (worth re-invoking as-is)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Kube(_) | Error::InventoryConnection(_) | Error::Create { .. }
        )
    }
}

/// Result type alias for the planner
pub type Result<T> = std::result::Result<T, Error>;
