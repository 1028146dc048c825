//! Plan CRD
//!
//! A Plan describes one migration job: the provider pair, the selected
//! VMs, and references to the network/storage mappings to apply.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::provider::{ObjectRef, ProviderPair};

// =============================================================================
// Plan CRD
// =============================================================================

/// Plan describes a set of VMs to migrate between a provider pair using
/// the referenced network and storage mappings.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "forklift.konveyor.io",
    version = "v1beta1",
    kind = "Plan",
    plural = "plans",
    namespaced,
    printcolumn = r#"{"name": "Source", "type": "string", "jsonPath": ".spec.provider.source.name"}"#,
    printcolumn = r#"{"name": "Target", "type": "string", "jsonPath": ".spec.provider.destination.name"}"#,
    printcolumn = r#"{"name": "Target-NS", "type": "string", "jsonPath": ".spec.targetNamespace"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct PlanSpec {
    /// Source and destination providers
    pub provider: ProviderPair,

    /// References to the network and storage mappings
    pub map: PlanMappings,

    /// Namespace the migrated VMs land in
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_namespace: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Warm migration (pre-copy while the source VM keeps running)
    #[serde(default)]
    pub warm: bool,

    /// Whether migrated PVC names use generateName. The platform forces
    /// this to true on creation; an explicit false has to be re-asserted
    /// with a patch after the Plan exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvc_name_template_use_generate_name: Option<bool>,

    /// Selected VMs, resolved against source inventory
    #[serde(default)]
    pub vms: Vec<PlanVm>,
}

/// References to the mappings a plan applies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanMappings {
    pub network: ObjectRef,
    pub storage: ObjectRef,
}

/// A VM selected for migration. After resolution both id and name are
/// populated; namespace is filled from inventory where available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanVm {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl PlanVm {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl Plan {
    /// Name of this plan
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("unknown")
    }
}
