use crate::query::expr::BIND_MARKER;
use crate::query::plan::{Order, Query};
use crate::query::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Final SQL text plus the values for its `$n` parameters; `params[i]` binds
/// `$(i + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedStatement {
    pub text: String,
    pub params: Vec<Value>,
}

impl RenderedStatement {
    /// Number of distinct `$n` references in the text.
    pub fn marker_count(&self) -> usize {
        let bytes = self.text.as_bytes();
        let mut count = 0;
        let mut ix = 0;
        while ix < bytes.len() {
            if bytes[ix] == b'$' && bytes.get(ix + 1).is_some_and(u8::is_ascii_digit) {
                count += 1;
                ix += 1;
                while bytes.get(ix).is_some_and(u8::is_ascii_digit) {
                    ix += 1;
                }
            } else {
                ix += 1;
            }
        }
        count
    }

    /// Wraps the statement for plan introspection. Parameters are unchanged.
    pub fn explain(&self, options: &ExplainOptions) -> RenderedStatement {
        RenderedStatement {
            text: format!("{}{}", options.prefix(), self.text),
            params: self.params.clone(),
        }
    }
}

/// `text` followed by the bound values, e.g. `... where t.c = $1 -- [3, 'a']`.
impl std::fmt::Display for RenderedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -- [", self.text)?;
        for (ix, value) in self.params.iter().enumerate() {
            if ix > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainOptions {
    pub verbose: bool,
    pub analyze: bool,
    pub buffers: bool,
    pub settings: bool,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            analyze: true,
            buffers: true,
            settings: true,
        }
    }
}

impl ExplainOptions {
    pub fn plain() -> Self {
        Self {
            verbose: false,
            analyze: false,
            buffers: false,
            settings: false,
        }
    }

    fn prefix(&self) -> String {
        let flags: Vec<&str> = [
            (self.verbose, "verbose"),
            (self.analyze, "analyze"),
            (self.buffers, "buffers"),
            (self.settings, "settings"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        if flags.is_empty() {
            "explain ".to_string()
        } else {
            format!("explain ({}) ", flags.join(", "))
        }
    }
}

/// Clause order: verb, targets, from, joins, where, group by, order by,
/// offset, limit. Only the predicate carries bind markers; a literal `$$`
/// in targets or table names is emitted as written. Predicate identifiers
/// containing `$$` are rejected by [`Query::validate`].
pub fn render(query: &Query) -> RenderedStatement {
    let mut params = Vec::new();
    let mut qb = String::new();
    qb.push_str(&query.statement);
    if !query.targets.is_empty() {
        qb.push(' ');
        qb.push_str(&query.targets.join(", "));
    }
    qb.push_str(" from ");
    qb.push_str(&query.tables.join(" "));
    for join in &query.joins {
        let _ = write!(
            qb,
            " inner join {} on {}.{} = {}.{}",
            join.right.table, join.left.table, join.left.column, join.right.table, join.right.column
        );
    }
    if let Some(predicate) = &query.predicate {
        let mut where_text = String::new();
        predicate.render_into(&mut where_text, &mut params);
        qb.push_str(" where ");
        qb.push_str(&enumerate_bind_markers(&where_text));
    }
    if !query.group_by.is_empty() {
        qb.push_str(" group by ");
        let columns: Vec<String> = query.group_by.iter().map(|c| c.qualified_name()).collect();
        qb.push_str(&columns.join(", "));
    }
    if !query.order_by.is_empty() {
        qb.push_str(" order by ");
        for (ix, term) in query.order_by.iter().enumerate() {
            if ix > 0 {
                qb.push_str(", ");
            }
            qb.push_str(&term.column.qualified_name());
            if term.order == Order::Desc {
                qb.push_str(" desc");
            }
        }
    }
    if let Some(pagination) = &query.pagination {
        if pagination.offset > 0 {
            let _ = write!(qb, " offset {}", pagination.offset);
        }
        if pagination.limit > 0 {
            let _ = write!(qb, " limit {}", pagination.limit);
        }
    }

    RenderedStatement { text: qb, params }
}

/// Rewrites the n-th [`BIND_MARKER`] occurrence, left to right, to `$n`.
pub fn enumerate_bind_markers(statement: &str) -> String {
    let mut result = String::with_capacity(statement.len());
    for (ix, part) in statement.split(BIND_MARKER).enumerate() {
        if ix > 0 {
            let _ = write!(result, "${ix}");
        }
        result.push_str(part);
    }
    result
}

impl Query {
    pub fn render(&self) -> RenderedStatement {
        render(self)
    }
}
