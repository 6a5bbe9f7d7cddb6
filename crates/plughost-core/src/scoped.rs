//! Per-contract incremental plugin activation.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;

use plughost_types::{Args, ContractKey, LoadError, TypeKey};
use tracing::debug;

use crate::discovery::find_types;
use crate::instantiate::create_instances;
use crate::module::{CandidateType, Module};
use crate::registry::SharedRegistry;

/// A loader view bound to one capability contract `C`.
///
/// Holds a non-owning handle to the shared registry plus its own record of
/// which candidate types it has already activated. Repeatedly polling
/// [`new_instances`](Self::new_instances) therefore activates exactly the
/// implementations that appeared since the previous poll, which is how a host
/// picks up hot-loaded plugins without reactivating everything.
///
/// The contract is a compile-time parameter, so results come back as
/// `Box<C>` directly. Registry operations are forwarded verbatim to the
/// shared registry; a scoped loader keeps no module state of its own.
///
/// ```
/// use plughost_core::{Module, PluginType, ScopedLoader};
/// use plughost_core::registry::ModuleRegistry;
/// use plughost_types::Args;
///
/// trait Codec { fn tag(&self) -> u8; }
/// struct Json;
/// impl Codec for Json {
///     fn tag(&self) -> u8 { 1 }
/// }
///
/// let registry = ModuleRegistry::new().into_shared();
/// let mut loader: ScopedLoader<dyn Codec> = ScopedLoader::new(registry);
/// loader.load_module(Module::new("codecs").with_type(
///     PluginType::<Json>::new()
///         .implements::<dyn Codec>(|value| value as Box<dyn Codec>)
///         .nullary(|| Json),
/// ));
///
/// let codecs = loader.instances(&Args::new());
/// assert_eq!(codecs.len(), 1);
/// assert!(loader.new_instances(&Args::new()).is_empty());
/// ```
pub struct ScopedLoader<C: ?Sized + 'static> {
    registry: SharedRegistry,
    instantiated: HashSet<TypeKey>,
    _contract: PhantomData<C>,
}

impl<C: ?Sized + 'static> ScopedLoader<C> {
    /// Bind a loader for `C` to an existing shared registry.
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            instantiated: HashSet::new(),
            _contract: PhantomData,
        }
    }

    /// The contract key this loader is bound to.
    pub fn contract() -> ContractKey {
        ContractKey::of::<C>()
    }

    /// Snapshot of candidate types satisfying the contract.
    ///
    /// With `only_new`, types already in the instantiated set are excluded.
    pub fn types(&self, only_new: bool) -> Vec<Rc<CandidateType>> {
        let types = find_types(&self.registry.borrow(), Self::contract());
        if only_new {
            types
                .into_iter()
                .filter(|ty| !self.instantiated.contains(&ty.key()))
                .collect()
        } else {
            types
        }
    }

    /// Candidate types not yet marked as instantiated.
    pub fn new_types(&self) -> Vec<Rc<CandidateType>> {
        self.types(true)
    }

    /// Activate every candidate with `args`, marking them as instantiated.
    pub fn instances(&mut self, args: &Args) -> Vec<Box<C>> {
        self.instances_with(args, None, true, false)
    }

    /// Activate only candidates that appeared since the last marked call.
    pub fn new_instances(&mut self, args: &Args) -> Vec<Box<C>> {
        self.instances_with(args, None, true, true)
    }

    /// Like [`new_instances`](Self::new_instances) with an explicit signature
    /// and control over marking.
    pub fn new_instances_with(
        &mut self,
        args: &Args,
        signature: Option<&[TypeKey]>,
        mark_instantiated: bool,
    ) -> Vec<Box<C>> {
        self.instances_with(args, signature, mark_instantiated, true)
    }

    /// Full-control activation.
    ///
    /// Candidates are marked as instantiated *before* any constructor runs,
    /// so a faulting constructor is still excluded from later `only_new`
    /// calls rather than being retried forever.
    pub fn instances_with(
        &mut self,
        args: &Args,
        signature: Option<&[TypeKey]>,
        mark_instantiated: bool,
        only_new: bool,
    ) -> Vec<Box<C>> {
        let types = self.types(only_new);
        debug!(
            contract = %Self::contract(),
            candidates = types.len(),
            only_new,
            mark_instantiated,
            "creating plugin instances"
        );

        if mark_instantiated {
            for ty in &types {
                self.instantiated.insert(ty.key());
            }
        }

        create_instances(&types, args, signature)
            .into_iter()
            .filter_map(|(ty, instance)| ty.cast::<C>(instance))
            .collect()
    }

    /// Forget every previously activated type, making all of them eligible
    /// for the next `only_new` call again.
    pub fn clear_instantiated(&mut self) {
        self.instantiated.clear();
    }

    /// Keys of the types this loader has activated so far.
    pub fn instantiated(&self) -> &HashSet<TypeKey> {
        &self.instantiated
    }

    // Registry operations are forwarded verbatim; the scoped loader never
    // keeps module state of its own.

    pub fn load_module(&self, module: Module) -> bool {
        self.registry.borrow_mut().insert_module(module)
    }

    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<bool, LoadError> {
        self.registry.borrow_mut().load_from_path(path)
    }

    pub fn load_directory(&self, root: impl AsRef<Path>) -> usize {
        self.registry.borrow_mut().load_directory(root)
    }

    /// Clone of the shared registry handle.
    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }
}
