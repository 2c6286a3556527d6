pub mod error;
pub mod expr;
pub mod plan;
pub mod render;
pub mod value;

pub use error::QueryError;
pub use expr::{BIND_MARKER, DEFAULT_MAX_EXPR_DEPTH, Expr, QualifiedColumn, col};
pub use plan::{InnerJoin, Order, OrderTerm, Pagination, Query, ScopeLevel, ScopeSpec};
pub use render::{ExplainOptions, RenderedStatement, enumerate_bind_markers, render};
pub use value::{IntoQueryValue, Value, lit};
