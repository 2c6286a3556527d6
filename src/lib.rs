//! Parameterized SQL construction for query-plan benchmarks under row-level
//! scope restrictions.
//!
//! A [`Query`] template renders to SQL text with `$n` parameters. Scope
//! injection derives a restricted copy of a template for a concrete set of
//! cluster/namespace entries, and the samplers pick reproducible, nested
//! subsets of a namespace inventory to restrict to.
//!
//! ```
//! use scopebench::query::{Expr, Query, ScopeSpec};
//! use scopebench::scope::{NamespaceInventory, select_namespaces_ordered};
//!
//! let template = Query::select(&["count(*)"])
//!     .from("alerts")
//!     .where_(Expr::equals("alerts", "State", 0_i64))
//!     .scoped(ScopeSpec::namespace("alerts", "ClusterId", "Namespace"));
//!
//! let inventory = NamespaceInventory::from_rows([("C1", "nsA"), ("C1", "nsB")]);
//! let samples = select_namespaces_ordered(&inventory, &[1]);
//! let rendered = template.with_scope(&samples[0]).render();
//! assert_eq!(
//!     rendered.text,
//!     "select count(*) from alerts where ( ( ( alerts.ClusterId = $1 and \
//!      ( alerts.Namespace = $2 ) ) ) and alerts.State = $3 )"
//! );
//! assert_eq!(rendered.params.len(), 3);
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod query;
pub mod scope;

pub use config::BenchConfig;
pub use error::{ScopeBenchError, ScopeBenchErrorCode};
pub use query::{Expr, Query, RenderedStatement, Value};
pub use scope::{NamespaceInventory, ScopeEntry};
