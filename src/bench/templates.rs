//! Query templates planned by a default benchmark run.

use crate::query::expr::Expr;
use crate::query::plan::{Order, Query, ScopeSpec};

/// A query template with a stable label used in reports.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedQuery {
    pub name: String,
    pub query: Query,
}

impl NamedQuery {
    pub fn new(name: &str, query: Query) -> Self {
        Self {
            name: name.to_string(),
            query,
        }
    }
}

/// Riskiest images reachable from scoped deployments.
pub fn image_risk_by_namespace() -> NamedQuery {
    NamedQuery::new(
        "image_risk_by_namespace",
        Query::select(&[
            "distinct(images.Id) as Image_Sha",
            "images.RiskScore as image_risk_score",
        ])
        .from("images")
        .inner_join("images", "Id", "deployments_containers", "Image_Id")
        .inner_join("deployments_containers", "deployments_Id", "deployments", "Id")
        .order_by("images", "RiskScore", Order::Desc)
        .limit(6)
        .scoped(ScopeSpec::namespace("deployments", "ClusterId", "Namespace")),
    )
}

/// Open alerts of one severity.
pub fn alert_count_by_severity() -> NamedQuery {
    let state = Expr::equals("alerts", "State", 0_i64).or(Expr::equals("alerts", "State", 3_i64));
    NamedQuery::new(
        "alert_count_by_severity",
        Query::select(&["count(*)"])
            .from("alerts")
            .where_(Expr::equals("alerts", "Policy_Severity", 3_i64).and(state))
            .scoped(ScopeSpec::namespace("alerts", "ClusterId", "Namespace")),
    )
}

/// Open alert counts per severity. The state disjunction sits inside a
/// single-operand conjunction.
pub fn alert_severity_histogram() -> NamedQuery {
    let state = Expr::equals("alerts", "State", 0_i64).or(Expr::equals("alerts", "State", 3_i64));
    NamedQuery::new(
        "alert_severity_histogram",
        Query::select(&["policy_severity", "count(*)"])
            .from("alerts")
            .where_(Expr::all_from(state, std::iter::empty()))
            .group_by("alerts", "Policy_Severity")
            .scoped(ScopeSpec::namespace("alerts", "ClusterId", "Namespace")),
    )
}

pub fn default_templates() -> Vec<NamedQuery> {
    vec![image_risk_by_namespace(), alert_severity_histogram()]
}
