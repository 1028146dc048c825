//! Provider CRD
//!
//! A Provider registers a source or target virtualization endpoint
//! (vSphere, oVirt, OpenStack, OVA archive, or an OpenShift cluster).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Provider CRD
// =============================================================================

/// Provider registers a virtualization platform endpoint whose inventory
/// (VMs, networks, storage) can be browsed and migrated from or to.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "forklift.konveyor.io",
    version = "v1beta1",
    kind = "Provider",
    plural = "providers",
    namespaced,
    printcolumn = r#"{"name": "Type", "type": "string", "jsonPath": ".spec.type"}"#,
    printcolumn = r#"{"name": "URL", "type": "string", "jsonPath": ".spec.url"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    /// Platform type of the endpoint
    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    /// API endpoint URL (absent for the host cluster)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Reference to the credentials secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<ObjectRef>,
}

// =============================================================================
// Sub-Types
// =============================================================================

/// Supported provider platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Openshift,
    Vsphere,
    Ovirt,
    Openstack,
    Ova,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::Openshift => write!(f, "openshift"),
            ProviderType::Vsphere => write!(f, "vsphere"),
            ProviderType::Ovirt => write!(f, "ovirt"),
            ProviderType::Openstack => write!(f, "openstack"),
            ProviderType::Ova => write!(f, "ova"),
        }
    }
}

impl ProviderType {
    /// Inventory collection listing VM summaries (id, name, namespace)
    pub fn vm_collection(&self) -> &'static str {
        "vms"
    }

    /// Inventory collection listing VMs with full network/disk detail
    pub fn vm_detail_collection(&self) -> &'static str {
        "vms?detail=4"
    }

    /// Inventory collection listing candidate target networks
    pub fn network_collection(&self) -> &'static str {
        match self {
            ProviderType::Openshift => "networkattachmentdefinitions?detail=4",
            _ => "networks?detail=4",
        }
    }

    /// Inventory collection listing storage (classes or datastores)
    pub fn storage_collection(&self) -> &'static str {
        match self {
            ProviderType::Openshift => "storageclasses?detail=4",
            _ => "datastores?detail=4",
        }
    }
}

/// Reference to a namespaced object by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ObjectRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// Source/destination provider pair referenced by plans and mappings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPair {
    pub source: ObjectRef,
    pub destination: ObjectRef,
}

// =============================================================================
// Implementations
// =============================================================================

impl Provider {
    /// Name of this provider
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("unknown")
    }

    /// Cluster-assigned UID, used to address the provider in inventory paths
    pub fn uid(&self) -> Option<&str> {
        self.metadata.uid.as_deref()
    }

    /// Check whether this provider is an OpenShift cluster (valid target)
    pub fn is_openshift(&self) -> bool {
        self.spec.provider_type == ProviderType::Openshift
    }

    /// Build an ObjectRef pointing at this provider
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            name: self.metadata.name.clone().unwrap_or_default(),
            namespace: self.metadata.namespace.clone().unwrap_or_default(),
        }
    }
}
