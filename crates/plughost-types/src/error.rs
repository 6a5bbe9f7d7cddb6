//! Error taxonomy for module loading and plugin instantiation.
//!
//! Load and construction failures are expected runtime conditions: they are
//! returned as values and logged, never propagated as panics. Bulk operations
//! (directory scans, multi-type instantiation) absorb per-item failures after
//! logging them and simply omit the item from their result.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a plugin module from the filesystem.
///
/// Every variant leaves the registry unchanged.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not exist or is not a regular file.
    #[error("module path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be opened as a shared library.
    #[error("failed to open module library {}: {fault}", .path.display())]
    Open { path: PathBuf, fault: anyhow::Error },

    /// The library has no usable plugin entry point.
    #[error("no plugin entry point in {}: {fault}", .path.display())]
    EntryPoint { path: PathBuf, fault: anyhow::Error },
}

impl LoadError {
    /// The path the failed load was attempted from.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path } | Self::Open { path, .. } | Self::EntryPoint { path, .. } => {
                path
            }
        }
    }
}

/// Failure to construct a plugin instance from a candidate type.
#[derive(Debug, Error)]
pub enum InstantiateError {
    /// No registered constructor's parameter list equals the wanted
    /// signature in order and arity.
    #[error("type `{type_name}` has no constructor matching ({signature})")]
    NoMatchingConstructor {
        type_name: &'static str,
        signature: String,
    },

    /// A matching constructor ran and faulted. The fault carries anything the
    /// factory reported, including bad argument reads.
    #[error("constructor for `{type_name}` failed: {fault}")]
    ConstructionFailed {
        type_name: &'static str,
        fault: anyhow::Error,
    },
}
