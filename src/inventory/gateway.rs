//! Inventory Gateway
//!
//! Thin typed wrapper over the platform's HTTP inventory API. Each call
//! addresses one provider collection:
//! `{base}/providers/{type}/{uid}/{collection}`.

use crate::crd::Provider;
use crate::domain::ports::{
    InventorySource, TargetNetwork, TargetStorageClass, VmDetail, VmRecord,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the inventory gateway
#[derive(Debug, Clone, Default)]
pub struct InventoryConfig {
    /// Base URL of the inventory service
    pub base_url: String,
    /// Bearer token, if the service requires authentication
    pub token: Option<String>,
    /// Skip TLS certificate verification
    pub insecure_skip_tls: bool,
}

// =============================================================================
// Gateway
// =============================================================================

/// HTTP client for the inventory service
#[derive(Debug)]
pub struct InventoryGateway {
    config: InventoryConfig,
    http: reqwest::Client,
}

impl InventoryGateway {
    /// Create a gateway from explicit configuration
    pub fn new(config: InventoryConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Configuration("inventory URL is required".into()));
        }
        let mut builder = reqwest::Client::builder();
        if config.insecure_skip_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    /// Fetch one collection for a provider and return the decoded JSON
    async fn fetch(&self, provider: &Provider, collection: &str) -> Result<Value> {
        let url = collection_url(&self.config.base_url, provider, collection)?;
        debug!(%url, "fetching inventory collection");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::InventoryFetch(format!(
                "{url} returned {status}"
            )));
        }
        Ok(response.json().await?)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        provider: &Provider,
        collection: &str,
    ) -> Result<Vec<T>> {
        let value = self.fetch(provider, collection).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::InventoryFetch(format!("decoding {collection}: {e}")))
    }
}

/// Build the request URL for a provider collection
fn collection_url(base: &str, provider: &Provider, collection: &str) -> Result<String> {
    let uid = provider.uid().ok_or_else(|| {
        Error::InventoryFetch(format!(
            "provider {} has no uid; inventory not available",
            provider.name()
        ))
    })?;
    Ok(format!(
        "{}/providers/{}/{}/{}",
        base.trim_end_matches('/'),
        provider.spec.provider_type,
        uid,
        collection
    ))
}

/// Storage class entries embed the full object; pull the name and the
/// metadata annotations out of it.
fn parse_storage_classes(value: Value) -> Result<Vec<TargetStorageClass>> {
    let entries = value
        .as_array()
        .ok_or_else(|| Error::InventoryFetch("expected a storage class array".into()))?;

    let classes = entries
        .iter()
        .map(|entry| {
            let annotations: BTreeMap<String, String> = entry
                .pointer("/object/metadata/annotations")
                .and_then(|a| serde_json::from_value(a.clone()).ok())
                .unwrap_or_default();
            TargetStorageClass {
                name: entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                annotations,
            }
        })
        .collect();
    Ok(classes)
}

#[async_trait]
impl InventorySource for InventoryGateway {
    async fn vms(&self, provider: &Provider) -> Result<Vec<VmRecord>> {
        self.fetch_list(provider, provider.spec.provider_type.vm_collection())
            .await
    }

    async fn vm_details(&self, provider: &Provider) -> Result<Vec<VmDetail>> {
        self.fetch_list(provider, provider.spec.provider_type.vm_detail_collection())
            .await
    }

    async fn target_networks(&self, provider: &Provider) -> Result<Vec<TargetNetwork>> {
        self.fetch_list(provider, provider.spec.provider_type.network_collection())
            .await
    }

    async fn storage_classes(&self, provider: &Provider) -> Result<Vec<TargetStorageClass>> {
        let value = self
            .fetch(provider, provider.spec.provider_type.storage_collection())
            .await?;
        parse_storage_classes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{ProviderSpec, ProviderType};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn provider(provider_type: ProviderType, uid: Option<&str>) -> Provider {
        let mut p = Provider::new(
            "src",
            ProviderSpec {
                provider_type,
                url: None,
                secret: None,
            },
        );
        p.metadata.uid = uid.map(String::from);
        p
    }

    #[test]
    fn test_collection_url() {
        let p = provider(ProviderType::Vsphere, Some("abc-123"));
        let url = collection_url("https://inventory.example.com/", &p, "vms?detail=4").unwrap();
        assert_eq!(
            url,
            "https://inventory.example.com/providers/vsphere/abc-123/vms?detail=4"
        );
    }

    #[test]
    fn test_collection_url_requires_uid() {
        let p = provider(ProviderType::Vsphere, None);
        let err = collection_url("https://inventory.example.com", &p, "vms").unwrap_err();
        assert_matches!(err, Error::InventoryFetch(_));
    }

    #[test]
    fn test_parse_storage_classes() {
        let value = json!([
            {"uid": "u1", "name": "slow", "object": {"metadata": {"annotations": {
                "storageclass.kubernetes.io/is-default-class": "true"
            }}}},
            {"uid": "u2", "name": "bare"}
        ]);
        let classes = parse_storage_classes(value).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "slow");
        assert!(classes[0].annotated_true("storageclass.kubernetes.io/is-default-class"));
        assert_eq!(classes[1].name, "bare");
        assert!(classes[1].annotations.is_empty());
    }

    #[test]
    fn test_parse_storage_classes_rejects_object() {
        let err = parse_storage_classes(json!({"not": "an array"})).unwrap_err();
        assert_matches!(err, Error::InventoryFetch(_));
    }

    #[test]
    fn test_gateway_requires_base_url() {
        let err = InventoryGateway::new(InventoryConfig::default()).unwrap_err();
        assert_matches!(err, Error::Configuration(_));
    }
}
