//! Compensating cleanup for partially created resources
//!
//! The platform has no cross-resource transactions, so each resource
//! created during one provisioning call records a compensation here. On a
//! later failure the saga unwinds them in reverse order. Compensation
//! failures are warned about, never escalated; the original error is what
//! the caller sees.

use crate::domain::ports::ClusterOps;
use tracing::warn;

/// A delete that undoes one resource created earlier in the same call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    DeleteNetworkMap { namespace: String, name: String },
    DeleteStorageMap { namespace: String, name: String },
}

/// Ordered list of compensations for the current provisioning call
#[derive(Debug, Default)]
pub struct Saga {
    compensations: Vec<Compensation>,
}

impl Saga {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compensation for a resource that was just created
    pub fn record(&mut self, compensation: Compensation) {
        self.compensations.push(compensation);
    }

    pub fn is_empty(&self) -> bool {
        self.compensations.is_empty()
    }

    /// Hand over the recorded compensations without running them. Used
    /// once the plan is durably created and the maps pass to its ownership.
    pub fn take(&mut self) -> Vec<Compensation> {
        std::mem::take(&mut self.compensations)
    }

    /// Delete everything recorded so far, newest first. Failures are
    /// logged and skipped so every compensation gets a chance to run.
    pub async fn unwind(&mut self, cluster: &dyn ClusterOps) {
        while let Some(compensation) = self.compensations.pop() {
            let result = match &compensation {
                Compensation::DeleteNetworkMap { namespace, name } => {
                    cluster.delete_network_map(namespace, name).await
                }
                Compensation::DeleteStorageMap { namespace, name } => {
                    cluster.delete_storage_map(namespace, name).await
                }
            };
            if let Err(e) = result {
                warn!(?compensation, error = %e, "cleanup of partially created resource failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fake::FakeCluster;

    #[tokio::test]
    async fn test_unwind_runs_in_reverse_order() {
        let cluster = FakeCluster::new();
        let mut saga = Saga::new();
        saga.record(Compensation::DeleteNetworkMap {
            namespace: "demo".into(),
            name: "netmap-1".into(),
        });
        saga.record(Compensation::DeleteStorageMap {
            namespace: "demo".into(),
            name: "stormap-1".into(),
        });

        saga.unwind(&cluster).await;

        assert!(saga.is_empty());
        assert_eq!(
            cluster.deletes().await,
            vec!["StorageMap/demo/stormap-1", "NetworkMap/demo/netmap-1"]
        );
    }

    #[tokio::test]
    async fn test_unwind_survives_delete_failures() {
        let mut cluster = FakeCluster::new();
        cluster.fail_deletes = true;
        let mut saga = Saga::new();
        saga.record(Compensation::DeleteNetworkMap {
            namespace: "demo".into(),
            name: "netmap-1".into(),
        });

        // must not panic or return an error
        saga.unwind(&cluster).await;
        assert!(saga.is_empty());
    }

    #[tokio::test]
    async fn test_take_disarms_the_saga() {
        let cluster = FakeCluster::new();
        let mut saga = Saga::new();
        saga.record(Compensation::DeleteNetworkMap {
            namespace: "demo".into(),
            name: "netmap-1".into(),
        });

        let taken = saga.take();
        assert_eq!(taken.len(), 1);

        saga.unwind(&cluster).await;
        assert!(cluster.deletes().await.is_empty());
    }
}
