//! Plugin module descriptors and the typed registration builder.
//!
//! A [`Module`] is the unit of loading: a named collection of candidate type
//! descriptors. Without reflection, a plugin declares what a scan of its
//! binary would otherwise reveal: which concrete types it contains, which
//! contracts each satisfies, and which constructors each offers. The
//! [`PluginType`] builder keeps that declaration typed; the descriptors it
//! produces are erased so modules for unrelated contracts can share one
//! registry.
//!
//! In-process modules are registered directly. Shared-library modules export
//! a single entry-point function (see [`export_module!`]) that hands the
//! loader an owned descriptor; the library handle is kept alive inside the
//! module because the descriptor's closures point into the library's code.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use plughost_types::{ContractKey, CtorArgs, TypeKey};
use tracing::warn;

/// Erased factory: borrows the argument view, produces the concrete value or
/// a fault.
type BuildFn = Box<dyn Fn(&CtorArgs<'_>) -> anyhow::Result<Box<dyn Any>>>;

/// Erased upcast: a boxed concrete value becomes a boxed `Box<dyn Contract>`.
type CastFn = Box<dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>>>;

/// One registered constructor: an exact parameter signature plus its factory.
pub struct Constructor {
    params: Vec<TypeKey>,
    build: BuildFn,
}

impl Constructor {
    /// The parameter signature this constructor matches against, in order.
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    pub(crate) fn invoke(&self, args: &CtorArgs<'_>) -> anyhow::Result<Box<dyn Any>> {
        (self.build)(args)
    }
}

/// A concrete type registered by a plugin module.
///
/// Carries the type's identity, the contracts it satisfies (with the upcast
/// installed at registration time), and its constructors. Only concrete
/// `'static` types can form a descriptor; contract-only registrations are
/// unrepresentable.
pub struct CandidateType {
    key: TypeKey,
    casters: HashMap<ContractKey, CastFn>,
    constructors: Vec<Constructor>,
}

impl CandidateType {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Whether this type was registered as satisfying `contract`.
    pub fn satisfies(&self, contract: ContractKey) -> bool {
        self.casters.contains_key(&contract)
    }

    /// The contracts this type satisfies, in no particular order.
    pub fn contracts(&self) -> impl Iterator<Item = ContractKey> + '_ {
        self.casters.keys().copied()
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    pub(crate) fn find_constructor(&self, signature: &[TypeKey]) -> Option<&Constructor> {
        self.constructors
            .iter()
            .find(|ctor| ctor.params.as_slice() == signature)
    }

    /// Upcast an instance produced by one of this type's constructors to the
    /// contract object `Box<C>`.
    ///
    /// Returns `None` when `C` is not a registered contract of this type.
    pub fn cast<C: ?Sized + 'static>(&self, instance: Box<dyn Any>) -> Option<Box<C>> {
        let contract = ContractKey::of::<C>();
        let caster = self.casters.get(&contract)?;
        let erased = caster(instance)?;
        match erased.downcast::<Box<C>>() {
            Ok(boxed) => Some(*boxed),
            Err(_) => {
                warn!(
                    ty = self.name(),
                    contract = %contract,
                    "registered caster produced a mismatched contract object"
                );
                None
            }
        }
    }
}

/// Typed registration builder for one concrete plugin type.
///
/// ```
/// use plughost_core::module::PluginType;
/// use plughost_types::TypeKey;
///
/// trait Codec { fn name(&self) -> &'static str; }
///
/// struct Json { pretty: bool }
/// impl Codec for Json {
///     fn name(&self) -> &'static str { "json" }
/// }
///
/// let ty = PluginType::<Json>::new()
///     .implements::<dyn Codec>(|value| value as Box<dyn Codec>)
///     .nullary(|| Json { pretty: false })
///     .constructor(vec![TypeKey::of::<bool>()], |args| {
///         Ok(Json { pretty: *args.get::<bool>(0)? })
///     });
/// ```
pub struct PluginType<T: 'static> {
    key: TypeKey,
    casters: HashMap<ContractKey, CastFn>,
    constructors: Vec<Constructor>,
    _concrete: PhantomData<T>,
}

impl<T: 'static> PluginType<T> {
    pub fn new() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            casters: HashMap::new(),
            constructors: Vec::new(),
            _concrete: PhantomData,
        }
    }

    /// Declare that `T` satisfies contract `C`.
    ///
    /// The function performs the unsizing coercion, written
    /// `|value| value as Box<dyn Codec>`.
    pub fn implements<C: ?Sized + 'static>(mut self, upcast: fn(Box<T>) -> Box<C>) -> Self {
        let cast: CastFn = Box::new(move |erased| {
            let value = erased.downcast::<T>().ok()?;
            Some(Box::new(upcast(value)) as Box<dyn Any>)
        });
        self.casters.insert(ContractKey::of::<C>(), cast);
        self
    }

    /// Register a constructor with an explicit parameter signature.
    ///
    /// The factory reads its arguments from the borrowed view and may fault;
    /// faults are reported by the instantiation engine, never propagated as
    /// panics.
    pub fn constructor(
        mut self,
        params: Vec<TypeKey>,
        build: impl Fn(&CtorArgs<'_>) -> anyhow::Result<T> + 'static,
    ) -> Self {
        let erased: BuildFn = Box::new(move |args| Ok(Box::new(build(args)?) as Box<dyn Any>));
        self.constructors.push(Constructor {
            params,
            build: erased,
        });
        self
    }

    /// Register a no-argument constructor.
    pub fn nullary(self, build: impl Fn() -> T + 'static) -> Self {
        self.constructor(Vec::new(), move |_| Ok(build()))
    }

    pub fn finish(self) -> CandidateType {
        CandidateType {
            key: self.key,
            casters: self.casters,
            constructors: self.constructors,
        }
    }
}

impl<T: 'static> Default for PluginType<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded unit of plugin code: a unique identifier plus the candidate types
/// it contains.
///
/// Modules live for the process lifetime once registered; there is no unload.
pub struct Module {
    name: String,
    types: Vec<Rc<CandidateType>>,
    /// Keeps a path-loaded library mapped for as long as its descriptors are
    /// reachable.
    library: Option<libloading::Library>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            library: None,
        }
    }

    /// Add a candidate type described by the typed builder.
    pub fn with_type<T: 'static>(mut self, ty: PluginType<T>) -> Self {
        self.types.push(Rc::new(ty.finish()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[Rc<CandidateType>] {
        &self.types
    }

    pub(crate) fn attach_library(&mut self, library: libloading::Library) {
        self.library = Some(library);
    }
}

/// Symbol every loadable plugin library must export.
pub const MODULE_ENTRY_POINT: &[u8] = b"plughost_module\0";

/// Signature of the exported entry-point function.
///
/// The function transfers ownership of a heap-allocated [`Module`] to the
/// loader. Host and plugin must be built against the same plughost version;
/// ABI compatibility across versions is out of scope.
pub type ModuleEntryFn = unsafe extern "C" fn() -> *mut Module;

/// Export a module descriptor from a plugin shared library.
///
/// ```ignore
/// plughost_core::export_module! {
///     plughost_core::module::Module::new("codecs")
///         .with_type(
///             plughost_core::module::PluginType::<Json>::new()
///                 .implements::<dyn Codec>(|value| value as Box<dyn Codec>)
///                 .nullary(|| Json::default()),
///         )
/// }
/// ```
#[macro_export]
macro_rules! export_module {
    ($build:expr) => {
        #[no_mangle]
        pub unsafe extern "C" fn plughost_module() -> *mut $crate::module::Module {
            ::std::boxed::Box::into_raw(::std::boxed::Box::new($build))
        }
    };
}
