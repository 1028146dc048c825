//! VM Migration Planner
//!
//! A command-line client for a Kubernetes virtualization-migration
//! platform. Given a set of VMs on a source provider, it validates the
//! selection against live inventory, synthesizes default network and
//! storage mappings when none are supplied, and creates the migration
//! Plan with best-effort compensating cleanup on partial failure.
//!
//! # Modules
//!
//! - [`crd`]: typed custom resources (Provider, Plan, NetworkMap,
//!   StorageMap, Migration)
//! - [`domain`]: collaborator ports (inventory service, cluster API)
//! - [`inventory`]: HTTP inventory gateway
//! - [`cluster`]: kube-backed cluster client
//! - [`provision`]: the plan provisioning workflow
//! - [`error`]: error types and handling

pub mod cluster;
pub mod crd;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod provision;

// Re-export commonly used types
pub use cluster::ClusterClient;
pub use crd::{
    Migration, MigrationSpec, NetworkMap, NetworkMapSpec, Plan, PlanSpec, PlanVm, Provider,
    ProviderSpec, ProviderType, StorageMap, StorageMapSpec,
};
pub use domain::ports::{ClusterOps, InventorySource};
pub use error::{Error, Result};
pub use inventory::{InventoryConfig, InventoryGateway};
pub use provision::{PlanCreateOptions, PlanProvisioner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
