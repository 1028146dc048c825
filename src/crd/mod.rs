//! Custom Resource Definitions
//!
//! Typed views of the migration platform CRDs consumed by this client:
//! Provider, Plan, NetworkMap, StorageMap, and Migration.

mod mapping;
mod migration;
mod plan;
mod provider;

pub use mapping::{
    MappedSourceRef, NetworkDestination, NetworkDestinationType, NetworkMap, NetworkMapSpec,
    NetworkPair, StorageDestination, StorageMap, StorageMapSpec, StoragePair,
};
pub use migration::{Migration, MigrationSpec};
pub use plan::{Plan, PlanMappings, PlanSpec, PlanVm};
pub use provider::{ObjectRef, Provider, ProviderPair, ProviderSpec, ProviderType};

/// API group of the migration platform CRDs
pub const API_GROUP: &str = "forklift.konveyor.io";

/// API version of the migration platform CRDs
pub const API_VERSION: &str = "forklift.konveyor.io/v1beta1";
