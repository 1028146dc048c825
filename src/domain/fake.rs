//! In-memory fakes of the collaborator ports, shared by unit tests

use crate::crd::{NetworkMap, Plan, Provider, ProviderSpec, ProviderType, StorageMap};
use crate::domain::ports::{
    ClusterOps, InventorySource, TargetNetwork, TargetStorageClass, VmDetail, VmRecord,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use kube::core::ErrorResponse;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Build a provider with namespace and uid populated, as the API would
pub fn make_provider(name: &str, namespace: &str, provider_type: ProviderType) -> Provider {
    let mut provider = Provider::new(
        name,
        ProviderSpec {
            provider_type,
            url: None,
            secret: None,
        },
    );
    provider.metadata.namespace = Some(namespace.to_string());
    provider.metadata.uid = Some(format!("uid-{name}"));
    provider
}

fn api_failure(message: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".into(),
        message: message.into(),
        reason: "InternalError".into(),
        code: 500,
    })
}

// =============================================================================
// Fake Inventory
// =============================================================================

/// Canned inventory responses
#[derive(Default)]
pub struct FakeInventory {
    pub vms: Vec<VmRecord>,
    pub details: Vec<VmDetail>,
    pub networks: Vec<TargetNetwork>,
    pub classes: Vec<TargetStorageClass>,
}

#[async_trait]
impl InventorySource for FakeInventory {
    async fn vms(&self, _provider: &Provider) -> Result<Vec<VmRecord>> {
        Ok(self.vms.clone())
    }

    async fn vm_details(&self, _provider: &Provider) -> Result<Vec<VmDetail>> {
        Ok(self.details.clone())
    }

    async fn target_networks(&self, _provider: &Provider) -> Result<Vec<TargetNetwork>> {
        Ok(self.networks.clone())
    }

    async fn storage_classes(&self, _provider: &Provider) -> Result<Vec<TargetStorageClass>> {
        Ok(self.classes.clone())
    }
}

// =============================================================================
// Fake Cluster
// =============================================================================

#[derive(Default)]
struct FakeState {
    providers: Vec<Provider>,
    plans: BTreeMap<String, Plan>,
    network_maps: BTreeMap<String, NetworkMap>,
    storage_maps: BTreeMap<String, StorageMap>,
    patches: Vec<(String, serde_json::Value)>,
    deletes: Vec<String>,
    counter: u32,
}

/// In-memory stand-in for the Kubernetes API with failure injection
#[derive(Default)]
pub struct FakeCluster {
    state: RwLock<FakeState>,
    pub fail_create_network_map: bool,
    pub fail_create_storage_map: bool,
    pub fail_create_plan: bool,
    pub fail_deletes: bool,
    pub fail_patches: bool,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_provider(&self, provider: Provider) {
        self.state.write().await.providers.push(provider);
    }

    pub async fn plan_count(&self) -> usize {
        self.state.read().await.plans.len()
    }

    pub async fn network_maps(&self) -> Vec<NetworkMap> {
        self.state.read().await.network_maps.values().cloned().collect()
    }

    pub async fn storage_maps(&self) -> Vec<StorageMap> {
        self.state.read().await.storage_maps.values().cloned().collect()
    }

    /// Patch calls recorded as ("Kind/namespace/name", body)
    pub async fn patches(&self) -> Vec<(String, serde_json::Value)> {
        self.state.read().await.patches.clone()
    }

    /// Delete calls recorded as "Kind/namespace/name"
    pub async fn deletes(&self) -> Vec<String> {
        self.state.read().await.deletes.clone()
    }
}

fn key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn get_provider(&self, namespace: &str, name: &str) -> Result<Provider> {
        let state = self.state.read().await;
        state
            .providers
            .iter()
            .find(|p| {
                p.metadata.name.as_deref() == Some(name)
                    && p.metadata.namespace.as_deref() == Some(namespace)
            })
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "Provider".into(),
                namespace: namespace.into(),
                name: name.into(),
            })
    }

    async fn find_default_target_provider(&self, namespace: &str) -> Result<Provider> {
        let state = self.state.read().await;
        state
            .providers
            .iter()
            .find(|p| p.metadata.namespace.as_deref() == Some(namespace) && p.is_openshift())
            .cloned()
            .ok_or_else(|| Error::NoDefaultProvider {
                namespace: namespace.into(),
            })
    }

    async fn get_plan(&self, namespace: &str, name: &str) -> Result<Option<Plan>> {
        Ok(self.state.read().await.plans.get(&key(namespace, name)).cloned())
    }

    async fn create_plan(&self, plan: &Plan) -> Result<Plan> {
        if self.fail_create_plan {
            return Err(Error::Create {
                kind: "Plan".into(),
                source: api_failure("plan create failed"),
            });
        }
        let mut state = self.state.write().await;
        let mut created = plan.clone();
        created.metadata.uid = Some(format!("plan-uid-{}", state.counter));
        state.counter += 1;
        let namespace = created.metadata.namespace.clone().unwrap_or_default();
        let name = created.metadata.name.clone().unwrap_or_default();
        state.plans.insert(key(&namespace, &name), created.clone());
        Ok(created)
    }

    async fn patch_plan(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        if self.fail_patches {
            return Err(Error::Patch {
                kind: "Plan".into(),
                name: name.into(),
                source: api_failure("patch failed"),
            });
        }
        self.state
            .write()
            .await
            .patches
            .push((format!("Plan/{namespace}/{name}"), patch));
        Ok(())
    }

    async fn create_network_map(&self, map: &NetworkMap) -> Result<NetworkMap> {
        if self.fail_create_network_map {
            return Err(Error::Create {
                kind: "NetworkMap".into(),
                source: api_failure("network map create failed"),
            });
        }
        let mut state = self.state.write().await;
        let mut created = map.clone();
        let base = created.metadata.generate_name.clone().unwrap_or_default();
        created.metadata.name = Some(format!("{base}{:05}", state.counter));
        created.metadata.uid = Some(format!("netmap-uid-{}", state.counter));
        state.counter += 1;
        let namespace = created.metadata.namespace.clone().unwrap_or_default();
        let name = created.metadata.name.clone().unwrap_or_default();
        state.network_maps.insert(key(&namespace, &name), created.clone());
        Ok(created)
    }

    async fn delete_network_map(&self, namespace: &str, name: &str) -> Result<()> {
        if self.fail_deletes {
            return Err(Error::Kube(api_failure("delete failed")));
        }
        let mut state = self.state.write().await;
        state.network_maps.remove(&key(namespace, name));
        state.deletes.push(format!("NetworkMap/{namespace}/{name}"));
        Ok(())
    }

    async fn patch_network_map(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        if self.fail_patches {
            return Err(Error::Patch {
                kind: "NetworkMap".into(),
                name: name.into(),
                source: api_failure("patch failed"),
            });
        }
        self.state
            .write()
            .await
            .patches
            .push((format!("NetworkMap/{namespace}/{name}"), patch));
        Ok(())
    }

    async fn create_storage_map(&self, map: &StorageMap) -> Result<StorageMap> {
        if self.fail_create_storage_map {
            return Err(Error::Create {
                kind: "StorageMap".into(),
                source: api_failure("storage map create failed"),
            });
        }
        let mut state = self.state.write().await;
        let mut created = map.clone();
        let base = created.metadata.generate_name.clone().unwrap_or_default();
        created.metadata.name = Some(format!("{base}{:05}", state.counter));
        created.metadata.uid = Some(format!("stormap-uid-{}", state.counter));
        state.counter += 1;
        let namespace = created.metadata.namespace.clone().unwrap_or_default();
        let name = created.metadata.name.clone().unwrap_or_default();
        state.storage_maps.insert(key(&namespace, &name), created.clone());
        Ok(created)
    }

    async fn delete_storage_map(&self, namespace: &str, name: &str) -> Result<()> {
        if self.fail_deletes {
            return Err(Error::Kube(api_failure("delete failed")));
        }
        let mut state = self.state.write().await;
        state.storage_maps.remove(&key(namespace, name));
        state.deletes.push(format!("StorageMap/{namespace}/{name}"));
        Ok(())
    }

    async fn patch_storage_map(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        if self.fail_patches {
            return Err(Error::Patch {
                kind: "StorageMap".into(),
                name: name.into(),
                source: api_failure("patch failed"),
            });
        }
        self.state
            .write()
            .await
            .patches
            .push((format!("StorageMap/{namespace}/{name}"), patch));
        Ok(())
    }
}
