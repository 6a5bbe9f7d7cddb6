//! Shared types for the plughost workspace.
//!
//! This crate provides foundational types used across the workspace:
//! - [`key`]: runtime identities for contracts and concrete types
//! - [`args`]: constructor argument values and signatures
//! - [`error`]: the load/instantiation error taxonomy
//! - [`ScanConfig`]: directory-scan configuration

pub mod args;
pub mod error;
pub mod key;

pub use args::{Args, CtorArgs};
pub use error::{InstantiateError, LoadError};
pub use key::{signature_string, ContractKey, TypeKey};

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for directory scans that discover plugin libraries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions recognized as loadable plugin libraries.
    pub extensions: Vec<String>,
}

impl ScanConfig {
    pub fn new(extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `path` carries a recognized library extension.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|known| known == ext)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["so".to_string(), "dylib".to_string(), "dll".to_string()],
        }
    }
}
