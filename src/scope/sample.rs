use crate::scope::ScopeEntry;
use crate::scope::inventory::NamespaceInventory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Clusters and namespaces walked in lexicographic order.
    Ordered,
    /// Same walk over orderings shuffled by a generator seeded from the
    /// inventory shape.
    PseudoRandom,
}

impl SamplingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SamplingMode::Ordered => "ordered",
            SamplingMode::PseudoRandom => "pseudo_random",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "ordered" => Some(SamplingMode::Ordered),
            "random" | "pseudo_random" | "pseudo-random" => Some(SamplingMode::PseudoRandom),
            _ => None,
        }
    }
}

impl std::fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn select_namespaces(
    inventory: &NamespaceInventory,
    sizes: &[usize],
    mode: SamplingMode,
) -> Vec<Vec<ScopeEntry>> {
    match mode {
        SamplingMode::Ordered => select_namespaces_ordered(inventory, sizes),
        SamplingMode::PseudoRandom => select_namespaces_random(inventory, sizes),
    }
}

/// One sample per requested size, each a prefix of the lexicographic
/// cluster-then-namespace walk. Samples come back short when the inventory
/// holds fewer entries than requested.
pub fn select_namespaces_ordered(
    inventory: &NamespaceInventory,
    sizes: &[usize],
) -> Vec<Vec<ScopeEntry>> {
    let (cluster_ids, namespaces_by_cluster) = inventory.sorted();
    take_prefixes(&cluster_ids, &namespaces_by_cluster, sizes)
}

/// Like [`select_namespaces_ordered`], but over a reproducible shuffle seeded
/// with [`NamespaceInventory::shape_seed`].
pub fn select_namespaces_random(
    inventory: &NamespaceInventory,
    sizes: &[usize],
) -> Vec<Vec<ScopeEntry>> {
    let seed = inventory.shape_seed();
    let (mut cluster_ids, mut namespaces_by_cluster) = inventory.sorted();
    let mut rng = StdRng::seed_from_u64(seed);

    shuffle(&mut cluster_ids, &mut rng);
    for cluster_id in &cluster_ids {
        if let Some(namespaces) = namespaces_by_cluster.get_mut(cluster_id) {
            shuffle(namespaces, &mut rng);
        }
    }
    debug!(
        seed,
        clusters = cluster_ids.len(),
        "shuffled namespace inventory"
    );

    take_prefixes(&cluster_ids, &namespaces_by_cluster, sizes)
}

/// Single forward Fisher-Yates pass: position `i` takes a uniform pick from
/// `[i, n)`.
fn shuffle<T>(items: &mut [T], rng: &mut StdRng) {
    let n = items.len();
    for i in 0..n.saturating_sub(1) {
        let pick = rng.gen_range(i..n);
        items.swap(i, pick);
    }
}

fn take_prefixes(
    cluster_ids: &[String],
    namespaces_by_cluster: &BTreeMap<String, Vec<String>>,
    sizes: &[usize],
) -> Vec<Vec<ScopeEntry>> {
    let walk: Vec<(&String, &String)> = cluster_ids
        .iter()
        .filter_map(|cluster_id| {
            namespaces_by_cluster
                .get(cluster_id)
                .map(|namespaces| (cluster_id, namespaces))
        })
        .flat_map(|(cluster_id, namespaces)| namespaces.iter().map(move |ns| (cluster_id, ns)))
        .collect();

    sizes
        .iter()
        .map(|&size| {
            walk.iter()
                .take(size)
                .map(|(cluster_id, ns)| ScopeEntry::new(cluster_id.as_str(), ns.as_str()))
                .collect::<Vec<_>>()
        })
        .collect()
}
