use scopebench::scope::{
    NamespaceInventory, SamplingMode, ScopeEntry, select_namespaces, select_namespaces_ordered,
    select_namespaces_random,
};
use std::collections::HashMap;

fn entry(cluster: &str, namespace: &str) -> ScopeEntry {
    ScopeEntry::new(cluster, namespace)
}

#[test]
fn ordered_sampling_concrete_case() {
    let mut map = HashMap::new();
    map.insert("C1".to_string(), vec!["nsA".to_string(), "nsB".to_string()]);
    map.insert("C2".to_string(), vec!["nsC".to_string()]);
    let inventory = NamespaceInventory::from(map);

    let samples = select_namespaces_ordered(&inventory, &[2, 3]);
    assert_eq!(
        samples,
        vec![
            vec![entry("C1", "nsA"), entry("C1", "nsB")],
            vec![entry("C1", "nsA"), entry("C1", "nsB"), entry("C2", "nsC")],
        ]
    );
}

fn large_inventory() -> NamespaceInventory {
    let mut inventory = NamespaceInventory::new();
    for c in 0..3 {
        for n in 0..20 {
            // insert in reverse so sorting is exercised
            inventory.insert(format!("Cluster{c}"), format!("namespace{:02}", 19 - n));
        }
    }
    inventory.add_cluster("ClusterEmpty");
    inventory
}

#[test]
fn pseudo_random_sampling_is_byte_identical_across_runs() {
    let inventory = large_inventory();
    let sizes = [1, 5, 100];
    let first = select_namespaces_random(&inventory, &sizes);
    let second = select_namespaces_random(&inventory.clone(), &sizes);
    assert_eq!(
        serde_json::to_vec(&first).expect("encode"),
        serde_json::to_vec(&second).expect("encode")
    );
    assert_eq!(first[2].len(), 60);
}

#[test]
fn same_shape_inventories_built_in_different_orders_agree() {
    let rows = [("b", "2"), ("a", "1"), ("b", "1"), ("a", "3"), ("c", "9")];
    let forward = NamespaceInventory::from_rows(rows);
    let backward = NamespaceInventory::from_rows(rows.iter().rev().copied());
    assert_eq!(forward.shape_seed(), backward.shape_seed());
    assert_eq!(
        select_namespaces_random(&forward, &[5]),
        select_namespaces_random(&backward, &[5])
    );
}

#[test]
fn both_modes_nest_across_increasing_sizes() {
    let inventory = large_inventory();
    let sizes = [1, 5, 20, 21, 59, 60, 500];
    for mode in [SamplingMode::Ordered, SamplingMode::PseudoRandom] {
        let samples = select_namespaces(&inventory, &sizes, mode);
        for pair in samples.windows(2) {
            assert!(pair[1].starts_with(&pair[0]), "{mode} samples must nest");
        }
        assert_eq!(samples.last().map(Vec::len), Some(60));
    }
}

#[test]
fn ordered_sampling_crosses_cluster_boundaries_in_order() {
    let inventory = large_inventory();
    let sample = &select_namespaces_ordered(&inventory, &[21])[0];
    assert_eq!(sample[0], entry("Cluster0", "namespace00"));
    assert_eq!(sample[19], entry("Cluster0", "namespace19"));
    assert_eq!(sample[20], entry("Cluster1", "namespace00"));
}
