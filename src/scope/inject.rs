use crate::query::expr::{Expr, QualifiedColumn};
use crate::query::plan::{Query, ScopeLevel};
use crate::scope::ScopeEntry;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::debug;

/// Derives a copy of `query` whose predicate also restricts rows to `scope`.
///
/// Per distinct cluster (ascending id) the restriction holds either
/// `cluster = ?` (cluster scope) or `( cluster = ? and ( ns = ? or ... ) )`
/// (namespace scope); the per-cluster terms are or-ed together and, when the
/// query already filters, and-ed in front of the existing predicate.
///
/// Returns an unchanged clone when `scope` is empty or the query carries no
/// scope level. `query` itself is never modified.
pub fn inject_scope_filter(query: &Query, scope: &[ScopeEntry]) -> Query {
    if query.scope.level == ScopeLevel::None {
        return query.clone();
    }

    // cluster -> (first namespace, remaining namespaces in supplied order)
    let mut namespaces_by_cluster: BTreeMap<&str, (&str, Vec<&str>)> = BTreeMap::new();
    for entry in scope {
        match namespaces_by_cluster.entry(entry.cluster_id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert((entry.namespace.as_str(), Vec::new()));
            }
            Entry::Occupied(mut slot) => slot.get_mut().1.push(entry.namespace.as_str()),
        }
    }

    let spec = &query.scope;
    let mut per_cluster = namespaces_by_cluster.iter().map(|(cluster_id, (first, rest))| {
        let cluster_term = Expr::Leaf(QualifiedColumn::new(
            &spec.table,
            &spec.cluster_column,
            *cluster_id,
        ));
        match spec.level {
            ScopeLevel::Namespace => {
                let namespace_term =
                    |ns: &str| Expr::equals(&spec.table, &spec.namespace_column, ns);
                let namespace_filter = Expr::any_from(
                    namespace_term(*first),
                    rest.iter().map(|ns| namespace_term(*ns)),
                );
                cluster_term.and(namespace_filter)
            }
            ScopeLevel::Cluster | ScopeLevel::None => cluster_term,
        }
    });

    let Some(first_cluster) = per_cluster.next() else {
        return query.clone();
    };
    let scope_filter = Expr::any_from(first_cluster, per_cluster);

    debug!(
        level = %spec.level,
        clusters = namespaces_by_cluster.len(),
        entries = scope.len(),
        "injected scope filter"
    );

    let predicate = match &query.predicate {
        Some(existing) => scope_filter.and(existing.clone()),
        None => scope_filter,
    };
    Query {
        predicate: Some(predicate),
        ..query.clone()
    }
}

impl Query {
    pub fn with_scope(&self, scope: &[ScopeEntry]) -> Query {
        inject_scope_filter(self, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::inject_scope_filter;
    use crate::query::expr::Expr;
    use crate::query::plan::{Query, ScopeSpec};
    use crate::query::value::Value;
    use crate::scope::ScopeEntry;
    use proptest::prelude::*;

    fn alerts() -> Query {
        Query::select(&["count(*)"])
            .from("alerts")
            .scoped(ScopeSpec::namespace("alerts", "ClusterId", "Namespace"))
    }

    #[test]
    fn namespace_scope_groups_namespaces_under_their_cluster() {
        let scope = vec![
            ScopeEntry::new("C2", "nsC"),
            ScopeEntry::new("C1", "nsA"),
            ScopeEntry::new("C1", "nsB"),
        ];
        let rendered = inject_scope_filter(&alerts(), &scope).render();
        assert_eq!(
            rendered.text,
            "select count(*) from alerts where ( \
             ( alerts.ClusterId = $1 and ( alerts.Namespace = $2 or alerts.Namespace = $3 ) ) or \
             ( alerts.ClusterId = $4 and ( alerts.Namespace = $5 ) ) )"
        );
        let expected: Vec<Value> = ["C1", "nsA", "nsB", "C2", "nsC"]
            .into_iter()
            .map(|s| Value::Text(s.into()))
            .collect();
        assert_eq!(rendered.params, expected);
    }

    #[test]
    fn namespaces_keep_supplied_order_within_cluster() {
        let scope = vec![
            ScopeEntry::new("C1", "nsZ"),
            ScopeEntry::new("C0", "nsQ"),
            ScopeEntry::new("C1", "nsA"),
            ScopeEntry::new("C1", "nsM"),
        ];
        let rendered = alerts().with_scope(&scope).render();
        let expected: Vec<Value> = ["C0", "nsQ", "C1", "nsZ", "nsA", "nsM"]
            .into_iter()
            .map(|s| Value::Text(s.into()))
            .collect();
        assert_eq!(rendered.params, expected);
        assert_eq!(rendered.marker_count(), 6);
    }

    #[test]
    fn cluster_scope_emits_one_equality_per_cluster() {
        let query = Query::select(&["*"])
            .from("deployments")
            .scoped(ScopeSpec::cluster("deployments", "ClusterId"));
        let scope = vec![
            ScopeEntry::new("C1", "nsA"),
            ScopeEntry::new("C1", "nsB"),
            ScopeEntry::new("C3", "nsZ"),
        ];
        let rendered = query.with_scope(&scope).render();
        assert_eq!(
            rendered.text,
            "select * from deployments where ( deployments.ClusterId = $1 or deployments.ClusterId = $2 )"
        );
        assert_eq!(
            rendered.params,
            vec![Value::Text("C1".into()), Value::Text("C3".into())]
        );
    }

    #[test]
    fn existing_predicate_is_and_ed_after_scope() {
        let query = alerts().where_(Expr::equals("alerts", "Policy_Severity", 3_i64));
        let scoped = query.with_scope(&[ScopeEntry::new("C1", "nsA")]);
        let rendered = scoped.render();
        assert_eq!(
            rendered.text,
            "select count(*) from alerts where ( \
             ( ( alerts.ClusterId = $1 and ( alerts.Namespace = $2 ) ) ) and \
             alerts.Policy_Severity = $3 )"
        );
        assert_eq!(rendered.params.last(), Some(&Value::Integer(3)));
        // the template keeps its existing predicate
        assert_eq!(
            query.predicate,
            Some(Expr::equals("alerts", "Policy_Severity", 3_i64))
        );
    }

    #[test]
    fn empty_scope_and_unscoped_queries_pass_through() {
        let query = alerts().where_(Expr::equals("alerts", "State", 0_i64));
        assert_eq!(inject_scope_filter(&query, &[]), query);
        assert_eq!(inject_scope_filter(&query, &[]).render(), query.render());

        let unscoped = Query::select(&["*"]).from("t");
        assert_eq!(
            inject_scope_filter(&unscoped, &[ScopeEntry::new("C1", "nsA")]),
            unscoped
        );
    }

    #[test]
    fn derived_query_keeps_every_other_field() {
        let query = alerts()
            .inner_join("alerts", "Id", "alert_tags", "Alert_Id")
            .group_by("alerts", "Policy_Severity")
            .order_by("alerts", "Policy_Severity", Default::default())
            .limit(10);
        let scoped = query.with_scope(&[ScopeEntry::new("C1", "nsA")]);
        assert_eq!(scoped.targets, query.targets);
        assert_eq!(scoped.tables, query.tables);
        assert_eq!(scoped.joins, query.joins);
        assert_eq!(scoped.group_by, query.group_by);
        assert_eq!(scoped.order_by, query.order_by);
        assert_eq!(scoped.pagination, query.pagination);
        assert_eq!(scoped.scope, query.scope);
        assert!(query.predicate.is_none());
    }

    fn arb_scope() -> impl Strategy<Value = Vec<ScopeEntry>> {
        prop::collection::vec(("c[0-4]", "n[0-9]{1,2}"), 1..24).prop_map(|rows| {
            rows.into_iter()
                .map(|(cluster, ns)| ScopeEntry::new(cluster, ns))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn one_disjunct_per_distinct_cluster(scope in arb_scope()) {
            let scoped = alerts().with_scope(&scope);
            let predicate = scoped.predicate.expect("scope filter");
            let disjuncts = predicate.operands().expect("or node");

            let mut clusters: Vec<&str> = scope.iter().map(|e| e.cluster_id.as_str()).collect();
            clusters.sort();
            clusters.dedup();
            prop_assert_eq!(disjuncts.len(), clusters.len());

            for (disjunct, cluster) in disjuncts.iter().zip(&clusters) {
                let parts = disjunct.operands().expect("and node");
                prop_assert_eq!(parts.len(), 2);
                let supplied = scope.iter().filter(|e| e.cluster_id == *cluster).count();
                prop_assert_eq!(parts[1].operands().expect("or node").len(), supplied);
            }
        }
    }
}
