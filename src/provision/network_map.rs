//! Default network map synthesis
//!
//! Derives the distinct set of source networks the selected VMs touch and
//! pairs each with a target candidate. When candidates run out, the first
//! unmatched network falls back to pod networking and the rest are ignored.

use crate::crd::{NetworkMap, NetworkMapSpec, NetworkPair};
use crate::domain::ports::{ClusterOps, InventorySource, TargetNetwork, VmDetail};
use crate::error::Result;
use crate::provision::SynthesisContext;
use kube::core::ObjectMeta;
use std::collections::HashSet;
use tracing::info;

/// Synthesize and create a default network map; returns the created object
/// with its server-generated name.
pub(crate) async fn synthesize_network_map(
    inventory: &dyn InventorySource,
    cluster: &dyn ClusterOps,
    ctx: &SynthesisContext<'_>,
    default_target_network: Option<&str>,
) -> Result<NetworkMap> {
    let details = inventory.vm_details(ctx.source).await?;
    let selected: HashSet<&str> = ctx.vms.iter().map(|v| v.id.as_str()).collect();
    let source_ids = distinct_network_ids(&details, &selected);

    let candidates = match default_target_network {
        // "pod" empties the candidate list so every network falls back
        Some(name) if name.eq_ignore_ascii_case("pod") => Vec::new(),
        Some(name) => vec![named_candidate(name)],
        None => inventory.target_networks(ctx.target).await?,
    };

    let pairs = pair_networks(&source_ids, &candidates);
    info!(
        plan = ctx.plan_name,
        networks = source_ids.len(),
        candidates = candidates.len(),
        "synthesizing default network map"
    );

    let map = NetworkMap {
        metadata: ObjectMeta {
            generate_name: Some(format!("{}-network-map-", ctx.plan_name)),
            namespace: Some(ctx.namespace.to_string()),
            ..Default::default()
        },
        spec: NetworkMapSpec {
            provider: ctx.provider_pair(),
            map: pairs,
        },
    };
    cluster.create_network_map(&map).await
}

/// Distinct source network ids referenced by the selected VMs, in
/// inventory iteration order.
fn distinct_network_ids(details: &[VmDetail], selected: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for vm in details.iter().filter(|vm| selected.contains(vm.id.as_str())) {
        for network in &vm.networks {
            if !network.id.is_empty() && seen.insert(network.id.clone()) {
                ids.push(network.id.clone());
            }
        }
    }
    ids
}

/// An explicitly named target, optionally qualified as "namespace/name"
fn named_candidate(name: &str) -> TargetNetwork {
    match name.split_once('/') {
        Some((namespace, name)) => TargetNetwork {
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        None => TargetNetwork {
            name: name.to_string(),
            namespace: String::new(),
        },
    }
}

/// Positional pairing: the i-th source id takes the i-th candidate as a
/// multus attachment; past the candidates, the first id maps to the pod
/// network and the rest are ignored. The pair list is never empty.
fn pair_networks(source_ids: &[String], candidates: &[TargetNetwork]) -> Vec<NetworkPair> {
    let mut pairs: Vec<NetworkPair> = source_ids
        .iter()
        .enumerate()
        .map(|(i, id)| match candidates.get(i) {
            Some(candidate) => {
                NetworkPair::multus(id, &candidate.name, candidate.namespace.clone())
            }
            None if i == 0 => NetworkPair::pod(id),
            None => NetworkPair::ignored(id),
        })
        .collect();

    if pairs.is_empty() {
        pairs.push(NetworkPair::placeholder());
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::NetworkDestinationType;
    use crate::domain::ports::InventoryRef;

    fn vm(id: &str, network_ids: &[&str]) -> VmDetail {
        VmDetail {
            id: id.into(),
            name: id.into(),
            networks: network_ids
                .iter()
                .map(|n| InventoryRef { id: (*n).into() })
                .collect(),
            disks: Vec::new(),
        }
    }

    fn target(name: &str) -> TargetNetwork {
        TargetNetwork {
            name: name.into(),
            namespace: "default".into(),
        }
    }

    #[test]
    fn test_distinct_ids_dedup_and_order() {
        let details = vec![vm("vm-1", &["net-a", "net-b"]), vm("vm-2", &["net-a"])];
        let selected = ["vm-1", "vm-2"].into_iter().collect();
        assert_eq!(distinct_network_ids(&details, &selected), vec!["net-a", "net-b"]);
    }

    #[test]
    fn test_distinct_ids_respects_selection() {
        let details = vec![vm("vm-1", &["net-a"]), vm("vm-2", &["net-b"])];
        let selected = ["vm-1"].into_iter().collect();
        assert_eq!(distinct_network_ids(&details, &selected), vec!["net-a"]);
    }

    #[test]
    fn test_pairing_first_pod_rest_ignored() {
        let ids = vec!["net-a".to_string(), "net-b".to_string()];
        let pairs = pair_networks(&ids, &[]);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].source.id, "net-a");
        assert_eq!(pairs[0].destination.destination_type, NetworkDestinationType::Pod);
        assert_eq!(pairs[1].source.id, "net-b");
        assert_eq!(
            pairs[1].destination.destination_type,
            NetworkDestinationType::Ignored
        );
    }

    #[test]
    fn test_pairing_positional_multus() {
        let ids = vec!["net-a".to_string(), "net-b".to_string(), "net-c".to_string()];
        let candidates = vec![target("vlan-10"), target("vlan-20")];
        let pairs = pair_networks(&ids, &candidates);
        assert_eq!(pairs[0].destination.name, "vlan-10");
        assert_eq!(
            pairs[0].destination.destination_type,
            NetworkDestinationType::Multus
        );
        assert_eq!(pairs[1].destination.name, "vlan-20");
        // third id is past the candidate list but not first, so ignored
        assert_eq!(
            pairs[2].destination.destination_type,
            NetworkDestinationType::Ignored
        );
    }

    #[test]
    fn test_empty_sources_yield_placeholder() {
        let pairs = pair_networks(&[], &[target("vlan-10")]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source.ref_type.as_deref(), Some("pod"));
        assert_eq!(pairs[0].destination.destination_type, NetworkDestinationType::Pod);
    }

    #[test]
    fn test_named_candidate_with_namespace() {
        let candidate = named_candidate("nets/vlan-10");
        assert_eq!(candidate.name, "vlan-10");
        assert_eq!(candidate.namespace, "nets");

        let candidate = named_candidate("vlan-10");
        assert_eq!(candidate.name, "vlan-10");
        assert!(candidate.namespace.is_empty());
    }
}
