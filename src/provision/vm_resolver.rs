//! VM selection resolution
//!
//! Normalizes a requested VM list against source inventory so that every
//! entry carries both id and name. Entries that match nothing are dropped
//! with a warning; an empty result aborts provisioning.

use crate::crd::{PlanVm, Provider};
use crate::domain::ports::{InventorySource, VmRecord};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Resolve the requested VMs against the source provider's inventory
pub async fn resolve_vms(
    inventory: &dyn InventorySource,
    source: &Provider,
    requested: &[PlanVm],
) -> Result<Vec<PlanVm>> {
    let records = inventory.vms(source).await?;
    let resolved = resolve_against(&records, requested);
    if resolved.is_empty() {
        return Err(Error::Validation(format!(
            "none of the requested VMs exist in the inventory of provider {}",
            source.name()
        )));
    }
    Ok(resolved)
}

/// Pure lookup against an inventory snapshot. Two passes: entries that
/// already carry an id, then entries addressed by name only.
fn resolve_against(records: &[VmRecord], requested: &[PlanVm]) -> Vec<PlanVm> {
    let mut by_id: HashMap<&str, &VmRecord> = HashMap::new();
    let mut by_name: HashMap<&str, &VmRecord> = HashMap::new();
    for record in records {
        by_id.entry(&record.id).or_insert(record);
        by_name.entry(&record.name).or_insert(record);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolved = Vec::new();

    for vm in requested.iter().filter(|v| !v.id.is_empty()) {
        match by_id.get(vm.id.as_str()) {
            Some(record) if seen.insert(&record.id) => {
                resolved.push(fill_entry(vm, record));
            }
            Some(_) => {}
            None => warn!(id = %vm.id, "requested VM id not found in source inventory, skipping"),
        }
    }

    for vm in requested.iter().filter(|v| v.id.is_empty()) {
        match by_name.get(vm.name.as_str()) {
            Some(record) if seen.insert(&record.id) => {
                resolved.push(fill_entry(vm, record));
            }
            Some(_) => {}
            None => {
                warn!(name = %vm.name, "requested VM name not found in source inventory, skipping")
            }
        }
    }

    resolved
}

fn fill_entry(requested: &PlanVm, record: &VmRecord) -> PlanVm {
    PlanVm {
        id: record.id.clone(),
        name: if requested.name.is_empty() {
            record.name.clone()
        } else {
            requested.name.clone()
        },
        // inventory wins for namespace; the request value is a fallback
        namespace: record
            .namespace
            .clone()
            .unwrap_or_else(|| requested.namespace.clone()),
    }
}
