//! Plan Provisioner
//!
//! Top-level orchestration of one plan creation: existence pre-check,
//! provider resolution, VM resolution, mapping synthesis, plan creation,
//! and the two best-effort post-creation patches. Resources created along
//! the way are rolled back via the saga if a later step fails.

use crate::crd::{
    ObjectRef, Plan, PlanMappings, PlanSpec, PlanVm, Provider, ProviderPair, API_VERSION,
};
use crate::domain::ports::{ClusterOpsRef, InventorySourceRef};
use crate::error::{Error, Result};
use crate::provision::network_map::synthesize_network_map;
use crate::provision::storage_map::synthesize_storage_map;
use crate::provision::vm_resolver::resolve_vms;
use crate::provision::{Compensation, Saga, SynthesisContext};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use serde_json::json;
use tracing::{info, warn};

// =============================================================================
// Options
// =============================================================================

/// Caller-supplied inputs for one plan creation
#[derive(Debug, Clone, Default)]
pub struct PlanCreateOptions {
    /// Plan name (fixed, not generated)
    pub name: String,
    /// Namespace the plan and any synthesized maps are created in
    pub namespace: String,
    /// Source provider name
    pub source_provider: String,
    /// Target provider name; the first openshift provider when unset
    pub target_provider: Option<String>,
    /// Requested VMs, each addressed by id or name
    pub vms: Vec<PlanVm>,
    /// Existing network map name; synthesized when unset
    pub network_mapping: Option<String>,
    /// Existing storage map name; synthesized when unset
    pub storage_mapping: Option<String>,
    /// Target for all source networks: "pod" or a named attachment
    pub default_target_network: Option<String>,
    /// Storage class for all source datastores; annotation heuristics
    /// pick one when unset
    pub default_target_storage_class: Option<String>,
    /// Namespace migrated VMs land in; the plan namespace when unset
    pub target_namespace: Option<String>,
    /// Free-form plan description
    pub description: Option<String>,
    /// Warm migration
    pub warm: bool,
    /// Explicit false is re-asserted with a patch after creation because
    /// the platform forces this field to true on create
    pub pvc_name_template_use_generate_name: Option<bool>,
}

// =============================================================================
// Provisioner
// =============================================================================

/// Orchestrates plan creation against the inventory and cluster ports
pub struct PlanProvisioner {
    inventory: InventorySourceRef,
    cluster: ClusterOpsRef,
}

impl PlanProvisioner {
    pub fn new(inventory: InventorySourceRef, cluster: ClusterOpsRef) -> Self {
        Self { inventory, cluster }
    }

    /// Create a plan together with any synthesized mappings. On failure,
    /// resources created by this call are deleted; pre-existing mappings
    /// are never touched.
    pub async fn create(&self, opts: PlanCreateOptions) -> Result<Plan> {
        if self
            .cluster
            .get_plan(&opts.namespace, &opts.name)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyExists {
                kind: "Plan".into(),
                name: opts.name.clone(),
            });
        }

        let source = self
            .cluster
            .get_provider(&opts.namespace, &opts.source_provider)
            .await?;
        let target = match &opts.target_provider {
            Some(name) => self.cluster.get_provider(&opts.namespace, name).await?,
            None => {
                let provider = self
                    .cluster
                    .find_default_target_provider(&opts.namespace)
                    .await?;
                info!(target = provider.name(), "using default target provider");
                provider
            }
        };

        let vms = resolve_vms(self.inventory.as_ref(), &source, &opts.vms).await?;
        info!(plan = %opts.name, vms = vms.len(), "resolved VM selection");

        let ctx = SynthesisContext {
            plan_name: &opts.name,
            namespace: &opts.namespace,
            source: &source,
            target: &target,
            vms: &vms,
        };
        let mut saga = Saga::new();

        let network_map_name = match &opts.network_mapping {
            Some(name) => name.clone(),
            None => {
                // first created resource; nothing to roll back on failure
                let created = synthesize_network_map(
                    self.inventory.as_ref(),
                    self.cluster.as_ref(),
                    &ctx,
                    opts.default_target_network.as_deref(),
                )
                .await?;
                let name = created.metadata.name.clone().unwrap_or_default();
                saga.record(Compensation::DeleteNetworkMap {
                    namespace: opts.namespace.clone(),
                    name: name.clone(),
                });
                name
            }
        };

        let storage_map_name = match &opts.storage_mapping {
            Some(name) => name.clone(),
            None => {
                match synthesize_storage_map(
                    self.inventory.as_ref(),
                    self.cluster.as_ref(),
                    &ctx,
                    opts.default_target_storage_class.as_deref(),
                )
                .await
                {
                    Ok(created) => {
                        let name = created.metadata.name.clone().unwrap_or_default();
                        saga.record(Compensation::DeleteStorageMap {
                            namespace: opts.namespace.clone(),
                            name: name.clone(),
                        });
                        name
                    }
                    Err(e) => {
                        saga.unwind(self.cluster.as_ref()).await;
                        return Err(e);
                    }
                }
            }
        };

        let plan = build_plan(&opts, &source, &target, vms, &network_map_name, &storage_map_name);
        let created = match self.cluster.create_plan(&plan).await {
            Ok(created) => created,
            Err(e) => {
                saga.unwind(self.cluster.as_ref()).await;
                return Err(e);
            }
        };
        info!(plan = created.name(), "plan created");

        // The platform forces pvcNameTemplateUseGenerateName to true on
        // create; re-assert an explicit false. The plan exists either way.
        if opts.pvc_name_template_use_generate_name == Some(false) {
            let patch = json!({"spec": {"pvcNameTemplateUseGenerateName": false}});
            if let Err(e) = self
                .cluster
                .patch_plan(&opts.namespace, &opts.name, patch)
                .await
            {
                warn!(plan = %opts.name, error = %e, "failed to re-assert pvcNameTemplateUseGenerateName");
            }
        }

        self.adopt_created_maps(&created, saga.take()).await;

        Ok(created)
    }

    /// Point maps created in this call at the plan so their lifecycle
    /// follows it. Best-effort: the plan is already durably created.
    async fn adopt_created_maps(&self, plan: &Plan, created: Vec<Compensation>) {
        let patch = match owner_patch(plan) {
            Ok(Some(patch)) => patch,
            Ok(None) => {
                warn!(plan = plan.name(), "created plan has no uid, skipping ownership patch");
                return;
            }
            Err(e) => {
                warn!(plan = plan.name(), error = %e, "failed to build owner reference");
                return;
            }
        };

        for entry in created {
            let result = match &entry {
                Compensation::DeleteNetworkMap { namespace, name } => {
                    self.cluster
                        .patch_network_map(namespace, name, patch.clone())
                        .await
                }
                Compensation::DeleteStorageMap { namespace, name } => {
                    self.cluster
                        .patch_storage_map(namespace, name, patch.clone())
                        .await
                }
            };
            if let Err(e) = result {
                warn!(plan = plan.name(), error = %e, "failed to set owner reference on created map");
            }
        }
    }
}

fn build_plan(
    opts: &PlanCreateOptions,
    source: &Provider,
    target: &Provider,
    vms: Vec<PlanVm>,
    network_map_name: &str,
    storage_map_name: &str,
) -> Plan {
    let spec = PlanSpec {
        provider: ProviderPair {
            source: source.object_ref(),
            destination: target.object_ref(),
        },
        map: PlanMappings {
            network: ObjectRef::new(network_map_name, opts.namespace.clone()),
            storage: ObjectRef::new(storage_map_name, opts.namespace.clone()),
        },
        target_namespace: opts
            .target_namespace
            .clone()
            .unwrap_or_else(|| opts.namespace.clone()),
        description: opts.description.clone(),
        warm: opts.warm,
        pvc_name_template_use_generate_name: opts.pvc_name_template_use_generate_name,
        vms,
    };
    let mut plan = Plan::new(&opts.name, spec);
    plan.metadata.namespace = Some(opts.namespace.clone());
    plan
}

/// Merge patch adding a controller owner reference to the plan
fn owner_patch(plan: &Plan) -> Result<Option<serde_json::Value>> {
    let Some(uid) = plan.metadata.uid.clone() else {
        return Ok(None);
    };
    let owner = OwnerReference {
        api_version: API_VERSION.into(),
        kind: "Plan".into(),
        name: plan.name().to_string(),
        uid,
        controller: Some(true),
        block_owner_deletion: None,
    };
    Ok(Some(json!({
        "metadata": {"ownerReferences": [serde_json::to_value(&owner)?]}
    })))
}
