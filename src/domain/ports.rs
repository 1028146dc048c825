//! Domain Ports - trait seams between the provisioning core and the platform
//!
//! Two external collaborators are consumed through these traits: the HTTP
//! inventory service and the Kubernetes API. Adapters implement them; unit
//! tests substitute in-memory fakes.

use crate::crd::{NetworkMap, Plan, Provider, StorageMap};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// Inventory Records
// =============================================================================

/// VM summary as reported by the inventory service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Present for openshift-type sources only
    #[serde(default)]
    pub namespace: Option<String>,
}

/// VM with full network/disk detail (`detail=4` inventory view)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmDetail {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Source networks this VM is attached to
    #[serde(default)]
    pub networks: Vec<InventoryRef>,

    /// Disks and the datastores backing them
    #[serde(default)]
    pub disks: Vec<DiskRecord>,
}

/// Bare id reference used throughout inventory payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRef {
    #[serde(default)]
    pub id: String,
}

/// A VM disk and the datastore backing it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskRecord {
    #[serde(default)]
    pub datastore: InventoryRef,
}

/// Candidate destination network on the target cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetNetwork {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,
}

/// Storage class on the target cluster, with its object annotations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStorageClass {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl TargetStorageClass {
    /// Check an annotation for the literal value "true"
    pub fn annotated_true(&self, key: &str) -> bool {
        self.annotations.get(key).map(String::as_str) == Some("true")
    }
}

// =============================================================================
// Inventory Port
// =============================================================================

/// Port for inventory queries against a provider's discovered objects
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// List VM summaries for a source provider
    async fn vms(&self, provider: &Provider) -> Result<Vec<VmRecord>>;

    /// List VMs with network/disk detail for a source provider
    async fn vm_details(&self, provider: &Provider) -> Result<Vec<VmDetail>>;

    /// List candidate destination networks on a target provider
    async fn target_networks(&self, provider: &Provider) -> Result<Vec<TargetNetwork>>;

    /// List storage classes on a target provider
    async fn storage_classes(&self, provider: &Provider) -> Result<Vec<TargetStorageClass>>;
}

// =============================================================================
// Cluster Port
// =============================================================================

/// Port for the custom-resource operations the provisioning workflow needs
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Fetch a provider by name
    async fn get_provider(&self, namespace: &str, name: &str) -> Result<Provider>;

    /// Find the first openshift-type provider in the namespace, used as
    /// the default migration target when the caller names none
    async fn find_default_target_provider(&self, namespace: &str) -> Result<Provider>;

    /// Fetch a plan, mapping 404 to None
    async fn get_plan(&self, namespace: &str, name: &str) -> Result<Option<Plan>>;

    /// Create a plan; the returned object carries server-assigned metadata
    async fn create_plan(&self, plan: &Plan) -> Result<Plan>;

    /// Merge-patch a plan
    async fn patch_plan(&self, namespace: &str, name: &str, patch: serde_json::Value)
        -> Result<()>;

    /// Create a network map (generateName); returns the created object
    async fn create_network_map(&self, map: &NetworkMap) -> Result<NetworkMap>;

    /// Delete a network map; missing objects are not an error
    async fn delete_network_map(&self, namespace: &str, name: &str) -> Result<()>;

    /// Merge-patch a network map
    async fn patch_network_map(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()>;

    /// Create a storage map (generateName); returns the created object
    async fn create_storage_map(&self, map: &StorageMap) -> Result<StorageMap>;

    /// Delete a storage map; missing objects are not an error
    async fn delete_storage_map(&self, namespace: &str, name: &str) -> Result<()>;

    /// Merge-patch a storage map
    async fn patch_storage_map(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type InventorySourceRef = Arc<dyn InventorySource>;
pub type ClusterOpsRef = Arc<dyn ClusterOps>;
