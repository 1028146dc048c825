//! Migration CRD
//!
//! A Migration starts execution of an existing Plan. The remote controller
//! owns the actual transfer pipeline; this client only creates the object.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::provider::ObjectRef;

/// Migration triggers execution of a Plan.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "forklift.konveyor.io",
    version = "v1beta1",
    kind = "Migration",
    plural = "migrations",
    namespaced,
    printcolumn = r#"{"name": "Plan", "type": "string", "jsonPath": ".spec.plan.name"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSpec {
    /// The plan to execute
    pub plan: ObjectRef,
}
