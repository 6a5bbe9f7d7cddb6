//! Root host facade owning the shared module registry.

use std::path::Path;
use std::rc::Rc;

use plughost_types::{Args, ContractKey, LoadError, ScanConfig, TypeKey};

use crate::discovery::find_types;
use crate::instantiate::create_instances;
use crate::module::{CandidateType, Module};
use crate::registry::{ModuleRegistry, SharedRegistry};
use crate::scoped::ScopedLoader;

/// The root loader a hosting application starts from.
///
/// Creates and owns the shared registry, forwards loads to it, and derives
/// per-contract [`ScopedLoader`]s that share it. Also offers one-shot typed
/// activation for hosts that do not need incremental polling.
pub struct PluginHost {
    registry: SharedRegistry,
}

impl PluginHost {
    /// A host with a fresh root registry and default scan configuration.
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            registry: ModuleRegistry::with_config(config).into_shared(),
        }
    }

    /// Clone of the shared registry handle.
    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    pub fn load_module(&self, module: Module) -> bool {
        self.registry.borrow_mut().insert_module(module)
    }

    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<bool, LoadError> {
        self.registry.borrow_mut().load_from_path(path)
    }

    pub fn load_directory(&self, root: impl AsRef<Path>) -> usize {
        self.registry.borrow_mut().load_directory(root)
    }

    pub fn module_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Snapshot of candidate types satisfying a contract known at runtime.
    pub fn find_types(&self, contract: ContractKey) -> Vec<Rc<CandidateType>> {
        find_types(&self.registry.borrow(), contract)
    }

    /// One-shot: discover and activate every implementation of `C`.
    ///
    /// No instantiated-type bookkeeping; use a [`ScopedLoader`] for
    /// incremental activation.
    pub fn instances_of<C: ?Sized + 'static>(&self, args: &Args) -> Vec<Box<C>> {
        self.instances_of_with::<C>(args, None)
    }

    /// Like [`instances_of`](Self::instances_of) with an explicit signature.
    pub fn instances_of_with<C: ?Sized + 'static>(
        &self,
        args: &Args,
        signature: Option<&[TypeKey]>,
    ) -> Vec<Box<C>> {
        let types = self.find_types(ContractKey::of::<C>());
        create_instances(&types, args, signature)
            .into_iter()
            .filter_map(|(ty, instance)| ty.cast::<C>(instance))
            .collect()
    }

    /// Derive a scoped loader for `C` sharing this host's registry.
    pub fn scoped<C: ?Sized + 'static>(&self) -> ScopedLoader<C> {
        ScopedLoader::new(self.registry())
    }
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}
