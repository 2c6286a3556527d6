use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Live tenant layout: cluster id to the namespaces it holds. A cluster may
/// hold no namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceInventory {
    namespaces_by_cluster: BTreeMap<String, Vec<String>>,
}

impl NamespaceInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the inventory from `(cluster id, namespace)` rows, as returned by
    /// a `select clusterid, name from namespaces` scan.
    pub fn from_rows<C, N>(rows: impl IntoIterator<Item = (C, N)>) -> Self
    where
        C: Into<String>,
        N: Into<String>,
    {
        let mut inventory = Self::new();
        for (cluster_id, namespace) in rows {
            inventory.insert(cluster_id, namespace);
        }
        inventory
    }

    pub fn insert(&mut self, cluster_id: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces_by_cluster
            .entry(cluster_id.into())
            .or_default()
            .push(namespace.into());
    }

    /// Registers a cluster even when it has no namespaces yet.
    pub fn add_cluster(&mut self, cluster_id: impl Into<String>) {
        self.namespaces_by_cluster.entry(cluster_id.into()).or_default();
    }

    pub fn cluster_count(&self) -> usize {
        self.namespaces_by_cluster.len()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces_by_cluster.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.namespace_count() == 0
    }

    /// Cluster ids in ascending order.
    pub fn cluster_ids(&self) -> impl Iterator<Item = &str> {
        self.namespaces_by_cluster.keys().map(String::as_str)
    }

    pub fn namespaces(&self, cluster_id: &str) -> &[String] {
        self.namespaces_by_cluster
            .get(cluster_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Coarse fingerprint of the inventory shape, not its content. Two
    /// inventories with the same cluster and namespace counts share a seed.
    pub fn shape_seed(&self) -> u64 {
        10_000 * self.cluster_count() as u64 + self.namespace_count() as u64
    }

    /// Cluster ids and per-cluster namespace lists, both sorted ascending.
    pub(crate) fn sorted(&self) -> (Vec<String>, BTreeMap<String, Vec<String>>) {
        let cluster_ids: Vec<String> = self.namespaces_by_cluster.keys().cloned().collect();
        let namespaces_by_cluster = self
            .namespaces_by_cluster
            .iter()
            .map(|(cluster_id, namespaces)| {
                let mut ordered = namespaces.clone();
                ordered.sort();
                (cluster_id.clone(), ordered)
            })
            .collect();
        (cluster_ids, namespaces_by_cluster)
    }
}

impl From<HashMap<String, Vec<String>>> for NamespaceInventory {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self {
            namespaces_by_cluster: map.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for NamespaceInventory {
    fn from(namespaces_by_cluster: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            namespaces_by_cluster,
        }
    }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for NamespaceInventory {
    fn from_iter<I: IntoIterator<Item = (C, N)>>(rows: I) -> Self {
        Self::from_rows(rows)
    }
}
