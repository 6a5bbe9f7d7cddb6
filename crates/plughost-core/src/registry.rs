//! Identifier-keyed store of loaded plugin modules.
//!
//! The registry is the single shared container behind every loader view.
//! In-process modules register under their name; shared-library modules
//! register under the path they were loaded from. Loading an identifier that
//! is already present is a no-op. Modules are never unloaded.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::anyhow;
use plughost_types::{LoadError, ScanConfig};
use tracing::{debug, error, info, warn};

use crate::module::{Module, ModuleEntryFn, MODULE_ENTRY_POINT};

/// Single-threaded shared handle to a [`ModuleRegistry`].
///
/// The registry is a plain mutable container with no internal locking;
/// `Rc<RefCell<_>>` keeps it off other threads entirely, which is this
/// engine's concurrency model.
pub type SharedRegistry = Rc<RefCell<ModuleRegistry>>;

/// Store of loaded plugin modules, keyed by unique identifier.
pub struct ModuleRegistry {
    modules: HashMap<String, Module>,
    config: ScanConfig,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            modules: HashMap::new(),
            config,
        }
    }

    pub fn into_shared(self) -> SharedRegistry {
        Rc::new(RefCell::new(self))
    }

    /// Register an in-process module under its name.
    ///
    /// Returns `true` if the module was newly inserted, `false` if the
    /// identifier was already registered (the registry is unchanged then).
    pub fn insert_module(&mut self, module: Module) -> bool {
        let name = module.name().to_string();
        if self.modules.contains_key(&name) {
            debug!(module = %name, "module already registered, skipping");
            return false;
        }
        debug!(module = %name, types = module.types().len(), "registered module");
        self.modules.insert(name, module);
        true
    }

    /// Load a plugin shared library and register it under its path.
    ///
    /// Returns `Ok(true)` on a fresh load and `Ok(false)` when the path is
    /// already a registered identifier. Every failure is logged at ERROR and
    /// returned; the registry is left unchanged.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<bool, LoadError> {
        let path = path.as_ref();
        let id = path.to_string_lossy().into_owned();
        if self.modules.contains_key(&id) {
            debug!(module = %id, "module already registered, skipping");
            return Ok(false);
        }

        let module = match open_library_module(path) {
            Ok(module) => module,
            Err(err) => {
                error!(path = %id, error = %err, "failed to load module");
                return Err(err);
            }
        };

        info!(module = %id, types = module.types().len(), "loaded module library");
        self.modules.insert(id, module);
        Ok(true)
    }

    /// Recursively load every recognized library file under `root`.
    ///
    /// A missing root is not an error: nothing is scanned and 0 is returned.
    /// Per-file failures are absorbed (already logged by [`Self::load_from_path`]).
    /// Returns the number of modules newly loaded.
    pub fn load_directory(&mut self, root: impl AsRef<Path>) -> usize {
        let root = root.as_ref();
        if !root.exists() {
            return 0;
        }
        debug!(root = %root.display(), "scanning directory for plugin modules");

        let mut files = Vec::new();
        collect_library_files(root, &self.config, &mut files);

        let mut loaded = 0;
        for file in files {
            if let Ok(true) = self.load_from_path(&file) {
                loaded += 1;
            }
        }
        loaded
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Iterate the registered modules; insertion order is irrelevant.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first walk collecting files with a recognized library extension.
fn collect_library_files(dir: &Path, config: &ScanConfig, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if path.is_dir() {
            collect_library_files(&path, config, out);
        } else if config.matches(&path) {
            out.push(path);
        }
    }
}

/// Open a shared library, resolve its entry point, and take ownership of the
/// module descriptor it returns.
fn open_library_module(path: &Path) -> Result<Module, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let library = unsafe { libloading::Library::new(path) }.map_err(|err| LoadError::Open {
        path: path.to_path_buf(),
        fault: anyhow::Error::new(err),
    })?;

    let raw = {
        let entry: libloading::Symbol<'_, ModuleEntryFn> =
            unsafe { library.get(MODULE_ENTRY_POINT) }.map_err(|err| LoadError::EntryPoint {
                path: path.to_path_buf(),
                fault: anyhow::Error::new(err),
            })?;
        unsafe { entry() }
    };
    if raw.is_null() {
        return Err(LoadError::EntryPoint {
            path: path.to_path_buf(),
            fault: anyhow!("entry point returned null"),
        });
    }

    // The descriptor's closures live in the library's code; the handle must
    // stay attached so it is never unmapped underneath them.
    let mut module = *unsafe { Box::from_raw(raw) };
    module.attach_library(library);
    Ok(module)
}
