//! Default storage map synthesis
//!
//! Resolves a single default target storage class and maps every source
//! datastore the selected VMs touch to it.

use crate::crd::{StorageMap, StorageMapSpec, StoragePair};
use crate::domain::ports::{ClusterOps, InventorySource, TargetStorageClass, VmDetail};
use crate::error::{Error, Result};
use crate::provision::SynthesisContext;
use kube::core::ObjectMeta;
use std::collections::HashSet;
use tracing::info;

/// Virt-specific default class marker, takes priority over the cluster one
const VIRT_DEFAULT_CLASS_ANNOTATION: &str = "storageclass.kubevirt.io/is-default-virt-class";

/// Standard cluster default class marker
const K8S_DEFAULT_CLASS_ANNOTATION: &str = "storageclass.kubernetes.io/is-default-class";

/// Synthesize and create a default storage map; returns the created object
/// with its server-generated name.
pub(crate) async fn synthesize_storage_map(
    inventory: &dyn InventorySource,
    cluster: &dyn ClusterOps,
    ctx: &SynthesisContext<'_>,
    default_storage_class: Option<&str>,
) -> Result<StorageMap> {
    let class = match default_storage_class {
        // explicit class is used verbatim, no inventory lookup
        Some(class) => class.to_string(),
        None => {
            let classes = inventory.storage_classes(ctx.target).await?;
            select_default_class(&classes)
                .ok_or_else(|| {
                    Error::InventoryFetch(format!(
                        "target provider {} has no storage classes",
                        ctx.target.name()
                    ))
                })?
                .name
                .clone()
        }
    };

    let details = inventory.vm_details(ctx.source).await?;
    let selected: HashSet<&str> = ctx.vms.iter().map(|v| v.id.as_str()).collect();
    let datastore_ids = distinct_datastore_ids(&details, &selected);

    info!(
        plan = ctx.plan_name,
        datastores = datastore_ids.len(),
        storage_class = %class,
        "synthesizing default storage map"
    );

    let mut pairs: Vec<StoragePair> = datastore_ids
        .iter()
        .map(|id| StoragePair::to_class(id, &class))
        .collect();
    if pairs.is_empty() {
        pairs.push(StoragePair::placeholder(&class));
    }

    let map = StorageMap {
        metadata: ObjectMeta {
            generate_name: Some(format!("{}-storage-map-", ctx.plan_name)),
            namespace: Some(ctx.namespace.to_string()),
            ..Default::default()
        },
        spec: StorageMapSpec {
            provider: ctx.provider_pair(),
            map: pairs,
        },
    };
    cluster.create_storage_map(&map).await
}

/// Pick the default target class: virt-default annotation first, then the
/// cluster default annotation, then the first entry.
fn select_default_class(classes: &[TargetStorageClass]) -> Option<&TargetStorageClass> {
    classes
        .iter()
        .find(|c| c.annotated_true(VIRT_DEFAULT_CLASS_ANNOTATION))
        .or_else(|| {
            classes
                .iter()
                .find(|c| c.annotated_true(K8S_DEFAULT_CLASS_ANNOTATION))
        })
        .or_else(|| classes.first())
}

/// Distinct datastore ids backing the selected VMs' disks, in inventory
/// iteration order.
fn distinct_datastore_ids(details: &[VmDetail], selected: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for vm in details.iter().filter(|vm| selected.contains(vm.id.as_str())) {
        for disk in &vm.disks {
            if !disk.datastore.id.is_empty() && seen.insert(disk.datastore.id.clone()) {
                ids.push(disk.datastore.id.clone());
            }
        }
    }
    ids
}
