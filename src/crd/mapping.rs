//! NetworkMap and StorageMap CRDs
//!
//! Mappings pair source-side networks/datastores with destinations on the
//! target cluster. Plans reference one of each.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::provider::ProviderPair;

// =============================================================================
// NetworkMap CRD
// =============================================================================

/// NetworkMap pairs source networks with target networks (or pod networking).
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "forklift.konveyor.io",
    version = "v1beta1",
    kind = "NetworkMap",
    plural = "networkmaps",
    namespaced,
    printcolumn = r#"{"name": "Source", "type": "string", "jsonPath": ".spec.provider.source.name"}"#,
    printcolumn = r#"{"name": "Destination", "type": "string", "jsonPath": ".spec.provider.destination.name"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMapSpec {
    /// Source and destination providers
    pub provider: ProviderPair,

    /// Network pairings
    #[serde(default)]
    pub map: Vec<NetworkPair>,
}

/// A single source network to destination network pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPair {
    pub source: MappedSourceRef,
    pub destination: NetworkDestination,
}

impl NetworkPair {
    /// Pair a source network with a named multus attachment on the target
    pub fn multus(source_id: impl Into<String>, name: impl Into<String>, namespace: String) -> Self {
        Self {
            source: MappedSourceRef::by_id(source_id),
            destination: NetworkDestination {
                name: name.into(),
                namespace,
                destination_type: NetworkDestinationType::Multus,
            },
        }
    }

    /// Pair a source network with the target pod network
    pub fn pod(source_id: impl Into<String>) -> Self {
        Self {
            source: MappedSourceRef::by_id(source_id),
            destination: NetworkDestination {
                name: String::new(),
                namespace: String::new(),
                destination_type: NetworkDestinationType::Pod,
            },
        }
    }

    /// Mark a source network as not migrated
    pub fn ignored(source_id: impl Into<String>) -> Self {
        Self {
            source: MappedSourceRef::by_id(source_id),
            destination: NetworkDestination {
                name: String::new(),
                namespace: String::new(),
                destination_type: NetworkDestinationType::Ignored,
            },
        }
    }

    /// Placeholder pair used when no VM references any network; the map
    /// object must never carry an empty pairing list.
    pub fn placeholder() -> Self {
        Self {
            source: MappedSourceRef {
                id: String::new(),
                name: String::new(),
                ref_type: Some("pod".into()),
            },
            destination: NetworkDestination {
                name: String::new(),
                namespace: String::new(),
                destination_type: NetworkDestinationType::Pod,
            },
        }
    }
}

/// Source side of a mapping pair, addressed by inventory id or by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappedSourceRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
}

impl MappedSourceRef {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Destination side of a network pairing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDestination {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(rename = "type")]
    pub destination_type: NetworkDestinationType,
}

/// How a source network lands on the target cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NetworkDestinationType {
    /// Named NetworkAttachmentDefinition on the target
    Multus,
    /// Target pod network
    #[default]
    Pod,
    /// Network is not migrated
    Ignored,
}

impl std::fmt::Display for NetworkDestinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkDestinationType::Multus => write!(f, "multus"),
            NetworkDestinationType::Pod => write!(f, "pod"),
            NetworkDestinationType::Ignored => write!(f, "ignored"),
        }
    }
}

// =============================================================================
// StorageMap CRD
// =============================================================================

/// StorageMap pairs source datastores with target storage classes.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "forklift.konveyor.io",
    version = "v1beta1",
    kind = "StorageMap",
    plural = "storagemaps",
    namespaced,
    printcolumn = r#"{"name": "Source", "type": "string", "jsonPath": ".spec.provider.source.name"}"#,
    printcolumn = r#"{"name": "Destination", "type": "string", "jsonPath": ".spec.provider.destination.name"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct StorageMapSpec {
    /// Source and destination providers
    pub provider: ProviderPair,

    /// Storage pairings
    #[serde(default)]
    pub map: Vec<StoragePair>,
}

/// A single source datastore to storage class pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoragePair {
    pub source: MappedSourceRef,
    pub destination: StorageDestination,
}

impl StoragePair {
    /// Pair a source datastore id with a target storage class
    pub fn to_class(source_id: impl Into<String>, storage_class: impl Into<String>) -> Self {
        Self {
            source: MappedSourceRef::by_id(source_id),
            destination: StorageDestination {
                storage_class: storage_class.into(),
            },
        }
    }

    /// Placeholder pair used when no VM references any datastore
    pub fn placeholder(storage_class: impl Into<String>) -> Self {
        let class = storage_class.into();
        Self {
            source: MappedSourceRef::by_name(class.clone()),
            destination: StorageDestination {
                storage_class: class,
            },
        }
    }
}

/// Destination side of a storage pairing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageDestination {
    pub storage_class: String,
}
