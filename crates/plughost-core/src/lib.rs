//! Plugin discovery and activation engine.
//!
//! Given a set of loaded plugin modules and a capability contract (an
//! object-safe trait), this crate finds every registered concrete
//! implementation and constructs instances of them by matching registered
//! constructors against supplied argument values.
//!
//! ## Key Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Module`] / [`PluginType`] | Module descriptors and the typed registration builder |
//! | [`ModuleRegistry`] | Identifier-keyed store of loaded modules |
//! | [`find_types`] | Contract-based discovery over the registry |
//! | [`create_instance`] / [`create_instances`] | Constructor matching and invocation |
//! | [`ScopedLoader`] | Per-contract incremental activation view |
//! | [`PluginHost`] | Root facade owning the shared registry |
//!
//! ## Architecture
//!
//! ```text
//! PluginHost ──owns──► SharedRegistry ◄──shares── ScopedLoader<C>
//!                          │                           │
//!                          ▼                           ▼
//!                    ModuleRegistry ──scan──► find_types ──match──► create_instances
//! ```

pub mod discovery;
pub mod host;
pub mod instantiate;
pub mod module;
pub mod registry;
pub mod scoped;

pub use discovery::find_types;
pub use host::PluginHost;
pub use instantiate::{create_instance, create_instances, Instance};
pub use module::{
    CandidateType, Constructor, Module, ModuleEntryFn, PluginType, MODULE_ENTRY_POINT,
};
pub use registry::{ModuleRegistry, SharedRegistry};
pub use scoped::ScopedLoader;
