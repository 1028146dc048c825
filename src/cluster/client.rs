//! Cluster Client
//!
//! kube-backed implementation of the `ClusterOps` port: namespaced typed
//! Api handles per CRD kind, 404 mapping, generateName creates, and merge
//! patches.

use crate::crd::{Migration, NetworkMap, Plan, Provider, StorageMap};
use crate::domain::ports::ClusterOps;
use crate::error::{Error, Result};
use async_trait::async_trait;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kube::Client;
use tracing::debug;

/// Check for the API's not-found response
fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

/// Typed client for the migration platform CRDs
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    /// Connect using the ambient kubeconfig / in-cluster configuration
    pub async fn connect() -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self { client })
    }

    /// Wrap an existing kube client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn providers(&self, namespace: &str) -> Api<Provider> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn plans(&self, namespace: &str) -> Api<Plan> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn network_maps(&self, namespace: &str) -> Api<NetworkMap> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn storage_maps(&self, namespace: &str) -> Api<StorageMap> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn migrations(&self, namespace: &str) -> Api<Migration> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Create a migration for an existing plan
    pub async fn create_migration(&self, migration: &Migration) -> Result<Migration> {
        let namespace = migration.metadata.namespace.clone().unwrap_or_default();
        self.migrations(&namespace)
            .create(&PostParams::default(), migration)
            .await
            .map_err(|source| Error::Create {
                kind: "Migration".into(),
                source,
            })
    }
}

#[async_trait]
impl ClusterOps for ClusterClient {
    async fn get_provider(&self, namespace: &str, name: &str) -> Result<Provider> {
        match self.providers(namespace).get(name).await {
            Ok(provider) => Ok(provider),
            Err(e) if is_not_found(&e) => Err(Error::NotFound {
                kind: "Provider".into(),
                namespace: namespace.into(),
                name: name.into(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_default_target_provider(&self, namespace: &str) -> Result<Provider> {
        let providers = self
            .providers(namespace)
            .list(&ListParams::default())
            .await?;
        providers
            .items
            .into_iter()
            .find(Provider::is_openshift)
            .ok_or_else(|| Error::NoDefaultProvider {
                namespace: namespace.into(),
            })
    }

    async fn get_plan(&self, namespace: &str, name: &str) -> Result<Option<Plan>> {
        match self.plans(namespace).get(name).await {
            Ok(plan) => Ok(Some(plan)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_plan(&self, plan: &Plan) -> Result<Plan> {
        let namespace = plan.metadata.namespace.clone().unwrap_or_default();
        self.plans(&namespace)
            .create(&PostParams::default(), plan)
            .await
            .map_err(|source| Error::Create {
                kind: "Plan".into(),
                source,
            })
    }

    async fn patch_plan(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        self.plans(namespace)
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|source| Error::Patch {
                kind: "Plan".into(),
                name: name.into(),
                source,
            })?;
        Ok(())
    }

    async fn create_network_map(&self, map: &NetworkMap) -> Result<NetworkMap> {
        let namespace = map.metadata.namespace.clone().unwrap_or_default();
        self.network_maps(&namespace)
            .create(&PostParams::default(), map)
            .await
            .map_err(|source| Error::Create {
                kind: "NetworkMap".into(),
                source,
            })
    }

    async fn delete_network_map(&self, namespace: &str, name: &str) -> Result<()> {
        debug!(%namespace, %name, "deleting network map");
        match self
            .network_maps(namespace)
            .delete(name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn patch_network_map(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        self.network_maps(namespace)
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|source| Error::Patch {
                kind: "NetworkMap".into(),
                name: name.into(),
                source,
            })?;
        Ok(())
    }

    async fn create_storage_map(&self, map: &StorageMap) -> Result<StorageMap> {
        let namespace = map.metadata.namespace.clone().unwrap_or_default();
        self.storage_maps(&namespace)
            .create(&PostParams::default(), map)
            .await
            .map_err(|source| Error::Create {
                kind: "StorageMap".into(),
                source,
            })
    }

    async fn delete_storage_map(&self, namespace: &str, name: &str) -> Result<()> {
        debug!(%namespace, %name, "deleting storage map");
        match self
            .storage_maps(namespace)
            .delete(name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn patch_storage_map(
        &self,
        namespace: &str,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<()> {
        self.storage_maps(namespace)
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|source| Error::Patch {
                kind: "StorageMap".into(),
                name: name.into(),
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    #[test]
    fn test_is_not_found() {
        let err = kube::Error::Api(ErrorResponse {
            status: "Failure".into(),
            message: "not found".into(),
            reason: "NotFound".into(),
            code: 404,
        });
        assert!(is_not_found(&err));

        let err = kube::Error::Api(ErrorResponse {
            status: "Failure".into(),
            message: "conflict".into(),
            reason: "AlreadyExists".into(),
            code: 409,
        });
        assert!(!is_not_found(&err));
    }
}
