//! Row-level scope: concrete cluster/namespace units, the inventory they are
//! sampled from, and the rewrite that restricts a query to a sample.

pub mod inject;
pub mod inventory;
pub mod sample;

use serde::{Deserialize, Serialize};

pub use inject::inject_scope_filter;
pub use inventory::NamespaceInventory;
pub use sample::{
    SamplingMode, select_namespaces, select_namespaces_ordered, select_namespaces_random,
};

/// One tenant unit eligible for scope restriction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub cluster_id: String,
    pub namespace: String,
}

impl ScopeEntry {
    pub fn new(cluster_id: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            namespace: namespace.into(),
        }
    }
}
