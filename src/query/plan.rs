use crate::query::error::QueryError;
use crate::query::expr::{BIND_MARKER, Expr, QualifiedColumn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// `inner join <right.table> on <left.table>.<left.column> = <right.table>.<right.column>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerJoin {
    pub left: QualifiedColumn,
    pub right: QualifiedColumn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTerm {
    pub column: QualifiedColumn,
    #[serde(default)]
    pub order: Order,
}

/// Zero disables the corresponding clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

/// Granularity of the row-level scope a query can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ScopeLevel {
    #[default]
    None,
    Cluster,
    Namespace,
}

impl ScopeLevel {
    /// Unrecognized labels map to `None`, which turns scope injection into a
    /// passthrough.
    pub fn from_label(label: &str) -> Self {
        match label {
            "cluster" => ScopeLevel::Cluster,
            "namespace" => ScopeLevel::Namespace,
            _ => ScopeLevel::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScopeLevel::None => "none",
            ScopeLevel::Cluster => "cluster",
            ScopeLevel::Namespace => "namespace",
        }
    }
}

impl std::fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ScopeLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ScopeLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(ScopeLevel::from_label(&label))
    }
}

/// Where the scope columns live for a given query template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeSpec {
    #[serde(default)]
    pub level: ScopeLevel,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub cluster_column: String,
    #[serde(default)]
    pub namespace_column: String,
}

impl ScopeSpec {
    pub fn cluster(table: &str, cluster_column: &str) -> Self {
        Self {
            level: ScopeLevel::Cluster,
            table: table.to_string(),
            cluster_column: cluster_column.to_string(),
            namespace_column: String::new(),
        }
    }

    pub fn namespace(table: &str, cluster_column: &str, namespace_column: &str) -> Self {
        Self {
            level: ScopeLevel::Namespace,
            table: table.to_string(),
            cluster_column: cluster_column.to_string(),
            namespace_column: namespace_column.to_string(),
        }
    }
}

/// Structural statement template. Built once and treated as immutable; scope
/// injection derives new values instead of editing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub statement: String,
    pub targets: Vec<String>,
    pub tables: Vec<String>,
    pub joins: Vec<InnerJoin>,
    pub predicate: Option<Expr>,
    pub order_by: Vec<OrderTerm>,
    pub pagination: Option<Pagination>,
    pub group_by: Vec<QualifiedColumn>,
    pub scope: ScopeSpec,
}

impl Query {
    pub fn statement(verb: &str) -> Self {
        Self {
            statement: verb.to_string(),
            targets: Vec::new(),
            tables: Vec::new(),
            joins: Vec::new(),
            predicate: None,
            order_by: Vec::new(),
            pagination: None,
            group_by: Vec::new(),
            scope: ScopeSpec::default(),
        }
    }

    pub fn select(targets: &[&str]) -> Self {
        Self::statement("select").targets(targets)
    }

    pub fn targets(mut self, targets: &[&str]) -> Self {
        self.targets = targets.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn from(mut self, table: &str) -> Self {
        self.tables.push(table.to_string());
        self
    }

    pub fn inner_join(
        mut self,
        left_table: &str,
        left_column: &str,
        right_table: &str,
        right_column: &str,
    ) -> Self {
        self.joins.push(InnerJoin {
            left: QualifiedColumn::unbound(left_table, left_column),
            right: QualifiedColumn::unbound(right_table, right_column),
        });
        self
    }

    pub fn where_(mut self, expr: Expr) -> Self {
        self.predicate = Some(expr);
        self
    }

    pub fn order_by(mut self, table: &str, column: &str, order: Order) -> Self {
        self.order_by.push(OrderTerm {
            column: QualifiedColumn::unbound(table, column),
            order,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = n;
        self
    }

    pub fn offset(mut self, n: usize) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).offset = n;
        self
    }

    pub fn group_by(mut self, table: &str, column: &str) -> Self {
        self.group_by.push(QualifiedColumn::unbound(table, column));
        self
    }

    pub fn scoped(mut self, scope: ScopeSpec) -> Self {
        self.scope = scope;
        self
    }

    /// Structural checks that rendering itself does not perform.
    pub fn validate(&self, max_expr_depth: usize) -> Result<(), QueryError> {
        if self.statement.trim().is_empty() {
            return Err(QueryError::InvalidQuery {
                reason: "statement verb is empty".into(),
            });
        }
        if self.tables.is_empty() {
            return Err(QueryError::InvalidQuery {
                reason: "query has no source table".into(),
            });
        }
        if self.scope.level != ScopeLevel::None {
            if self.scope.table.is_empty() || self.scope.cluster_column.is_empty() {
                return Err(QueryError::InvalidQuery {
                    reason: format!(
                        "{} scope requires a table and cluster column",
                        self.scope.level
                    ),
                });
            }
            if self.scope.level == ScopeLevel::Namespace && self.scope.namespace_column.is_empty()
            {
                return Err(QueryError::InvalidQuery {
                    reason: "namespace scope requires a namespace column".into(),
                });
            }
        }
        if let Some(predicate) = &self.predicate {
            predicate.validate_depth(max_expr_depth)?;
            if let Some(column) = predicate
                .leaves()
                .into_iter()
                .find(|c| c.table.contains(BIND_MARKER) || c.column.contains(BIND_MARKER))
            {
                return Err(QueryError::InvalidQuery {
                    reason: format!(
                        "predicate column {} contains the bind marker {BIND_MARKER}",
                        column.qualified_name()
                    ),
                });
            }
        }
        Ok(())
    }
}
