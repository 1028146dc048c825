//! Migration-plan provisioning workflow
//!
//! Validates the requested VM selection against source inventory,
//! synthesizes default network/storage mappings when none are named, and
//! creates the Plan with compensating cleanup on partial failure.

mod network_map;
mod planner;
mod saga;
mod storage_map;
mod vm_resolver;

pub use planner::{PlanCreateOptions, PlanProvisioner};
pub use saga::{Compensation, Saga};

use crate::crd::{PlanVm, Provider, ProviderPair};

/// Shared inputs for mapping synthesis
pub(crate) struct SynthesisContext<'a> {
    /// Name of the plan under construction, used as the generateName stem
    pub plan_name: &'a str,
    /// Namespace the plan and its maps live in
    pub namespace: &'a str,
    pub source: &'a Provider,
    pub target: &'a Provider,
    /// Resolved VM selection (ids populated)
    pub vms: &'a [PlanVm],
}

impl SynthesisContext<'_> {
    pub fn provider_pair(&self) -> ProviderPair {
        ProviderPair {
            source: self.source.object_ref(),
            destination: self.target.object_ref(),
        }
    }
}
