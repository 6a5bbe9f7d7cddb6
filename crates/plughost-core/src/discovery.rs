//! Contract-based discovery over the module registry.

use std::rc::Rc;

use plughost_types::ContractKey;
use tracing::debug;

use crate::module::CandidateType;
use crate::registry::ModuleRegistry;

/// Find every registered candidate type satisfying `contract`.
///
/// The result is a materialized snapshot: later registry mutation does not
/// affect it. There is no caching; every call rescans all modules, so cost is
/// linear in the total number of registered types.
pub fn find_types(registry: &ModuleRegistry, contract: ContractKey) -> Vec<Rc<CandidateType>> {
    let mut found = Vec::new();
    for module in registry.modules() {
        for ty in module.types() {
            if ty.satisfies(contract) {
                debug!(
                    ty = ty.name(),
                    module = module.name(),
                    contract = %contract,
                    "found matching plugin type"
                );
                found.push(Rc::clone(ty));
            }
        }
    }
    found
}
