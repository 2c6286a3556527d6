use crate::query::error::{CompositeOperator, QueryError};
use crate::query::value::{IntoQueryValue, Value};
use serde::{Deserialize, Serialize};

/// Placeholder emitted by leaves. Numbering into `$1, $2, ...` happens once,
/// over the rendered predicate.
pub const BIND_MARKER: &str = "$$";

/// Maximum nesting depth accepted by [`Expr::validate_depth`] unless configured
/// otherwise.
pub const DEFAULT_MAX_EXPR_DEPTH: usize = 32;

/// A `table.column` reference, optionally carrying the value it is compared to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedColumn {
    pub table: String,
    pub column: String,
    #[serde(default = "null_value")]
    pub value: Value,
}

fn null_value() -> Value {
    Value::Null
}

impl QualifiedColumn {
    pub fn new(table: &str, column: &str, value: impl IntoQueryValue) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            value: value.into_query_value(),
        }
    }

    /// Column reference without a bound value, for joins, ordering and grouping.
    pub fn unbound(table: &str, column: &str) -> Self {
        Self::new(table, column, Value::Null)
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// Operand list of an `and`/`or` node. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operands(Vec<Expr>);

impl Operands {
    fn from_first(first: Expr, rest: impl IntoIterator<Item = Expr>) -> Self {
        let mut children = vec![first];
        children.extend(rest);
        Self(children)
    }

    fn new(operator: CompositeOperator, children: Vec<Expr>) -> Result<Self, QueryError> {
        if children.is_empty() {
            return Err(QueryError::EmptyComposite { operator });
        }
        Ok(Self(children))
    }

    pub fn as_slice(&self) -> &[Expr] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Operands {
    type Item = &'a Expr;
    type IntoIter = std::slice::Iter<'a, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Leaf(QualifiedColumn),
    And(Operands),
    Or(Operands),
}

impl Expr {
    pub fn equals(table: &str, column: &str, value: impl IntoQueryValue) -> Expr {
        Expr::Leaf(QualifiedColumn::new(table, column, value))
    }

    /// Conjunction of `children`. Fails when `children` is empty.
    pub fn all(children: impl IntoIterator<Item = Expr>) -> Result<Expr, QueryError> {
        Operands::new(CompositeOperator::And, children.into_iter().collect()).map(Expr::And)
    }

    /// Disjunction of `children`. Fails when `children` is empty.
    pub fn any(children: impl IntoIterator<Item = Expr>) -> Result<Expr, QueryError> {
        Operands::new(CompositeOperator::Or, children.into_iter().collect()).map(Expr::Or)
    }

    /// Conjunction of `first` followed by `rest`; never empty.
    pub(crate) fn all_from(first: Expr, rest: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(Operands::from_first(first, rest))
    }

    /// Disjunction of `first` followed by `rest`; never empty.
    pub(crate) fn any_from(first: Expr, rest: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(Operands::from_first(first, rest))
    }

    pub fn and(self, rhs: Expr) -> Expr {
        Expr::And(Operands(vec![self, rhs]))
    }

    pub fn or(self, rhs: Expr) -> Expr {
        Expr::Or(Operands(vec![self, rhs]))
    }

    pub fn operands(&self) -> Option<&[Expr]> {
        match self {
            Expr::Leaf(_) => None,
            Expr::And(ops) | Expr::Or(ops) => Some(ops.as_slice()),
        }
    }

    /// Renders the tree to text with [`BIND_MARKER`] placeholders and the bound
    /// values in pre-order, left-to-right.
    pub fn render(&self) -> (String, Vec<Value>) {
        let mut text = String::new();
        let mut values = Vec::new();
        self.render_into(&mut text, &mut values);
        (text, values)
    }

    pub(crate) fn render_into(&self, text: &mut String, values: &mut Vec<Value>) {
        match self {
            Expr::Leaf(column) => {
                text.push_str(&column.table);
                text.push('.');
                text.push_str(&column.column);
                text.push_str(" = ");
                text.push_str(BIND_MARKER);
                values.push(column.value.clone());
            }
            Expr::And(ops) => render_group(ops, CompositeOperator::And, text, values),
            Expr::Or(ops) => render_group(ops, CompositeOperator::Or, text, values),
        }
    }

    /// Maximum nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Leaf(_) => 1,
            Expr::And(ops) | Expr::Or(ops) => {
                1 + ops.iter().map(Expr::depth).max().unwrap_or(0)
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Leaf(_) => 1,
            Expr::And(ops) | Expr::Or(ops) => ops.iter().map(Expr::leaf_count).sum(),
        }
    }

    /// Leaf columns in pre-order, left-to-right.
    pub fn leaves(&self) -> Vec<&QualifiedColumn> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a QualifiedColumn>) {
        match self {
            Expr::Leaf(column) => out.push(column),
            Expr::And(ops) | Expr::Or(ops) => {
                for operand in ops {
                    operand.collect_leaves(out);
                }
            }
        }
    }

    pub fn validate_depth(&self, max: usize) -> Result<(), QueryError> {
        let depth = self.depth();
        if depth > max {
            return Err(QueryError::ExpressionTooDeep { depth, max });
        }
        Ok(())
    }
}

fn render_group(
    ops: &Operands,
    operator: CompositeOperator,
    text: &mut String,
    values: &mut Vec<Value>,
) {
    text.push_str("( ");
    for (ix, operand) in ops.iter().enumerate() {
        if ix > 0 {
            text.push(' ');
            text.push_str(operator.keyword());
            text.push(' ');
        }
        operand.render_into(text, values);
    }
    text.push_str(" )");
}

pub struct ColumnRef {
    table: String,
    column: String,
}

pub fn col(table: &str, column: &str) -> ColumnRef {
    ColumnRef {
        table: table.to_string(),
        column: column.to_string(),
    }
}

impl ColumnRef {
    pub fn eq(self, value: Value) -> Expr {
        Expr::Leaf(QualifiedColumn {
            table: self.table,
            column: self.column,
            value,
        })
    }
}
