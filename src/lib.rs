//! plughost — activate plugins a host has no compile-time reference to.
//!
//! A host application declares a capability contract as an object-safe
//! trait. Plugin modules register concrete implementations of that contract
//! together with their constructors, either in-process or from shared
//! libraries discovered on disk. The host then activates every
//! implementation, or polls incrementally for implementations that appeared
//! since the last activation.
//!
//! ```
//! use plughost::{Args, Module, PluginHost, PluginType};
//!
//! trait Notifier {
//!     fn channel(&self) -> &'static str;
//! }
//!
//! struct Webhook;
//! impl Notifier for Webhook {
//!     fn channel(&self) -> &'static str { "webhook" }
//! }
//!
//! let host = PluginHost::new();
//! host.load_module(Module::new("notifiers").with_type(
//!     PluginType::<Webhook>::new()
//!         .implements::<dyn Notifier>(|value| value as Box<dyn Notifier>)
//!         .nullary(|| Webhook),
//! ));
//!
//! // One-shot activation of everything implementing the contract.
//! let notifiers = host.instances_of::<dyn Notifier>(&Args::new());
//! assert_eq!(notifiers.len(), 1);
//! assert_eq!(notifiers[0].channel(), "webhook");
//!
//! // Incremental activation: only what appeared since the last poll.
//! let mut scoped = host.scoped::<dyn Notifier>();
//! assert_eq!(scoped.instances(&Args::new()).len(), 1);
//! assert!(scoped.new_instances(&Args::new()).is_empty());
//! ```
//!
//! Shared-library plugins export their module descriptor with
//! [`export_module!`] and are picked up by [`PluginHost::load_from_path`] or
//! a recursive [`PluginHost::load_directory`] scan.

pub use plughost_core::{
    create_instance, create_instances, export_module, find_types, CandidateType, Constructor,
    Instance, Module, ModuleEntryFn, ModuleRegistry, PluginHost, PluginType, ScopedLoader,
    SharedRegistry, MODULE_ENTRY_POINT,
};
pub use plughost_types::{
    signature_string, Args, ContractKey, CtorArgs, InstantiateError, LoadError, ScanConfig,
    TypeKey,
};

/// Engine modules, for hosts that want the pieces rather than the facade.
pub mod engine {
    pub use plughost_core::{discovery, host, instantiate, module, registry, scoped};
}
