//! Benchmark trial matrix: which statements a run plans, and the seam through
//! which a database driver executes them.

pub mod plan;
pub mod runner;
pub mod templates;

pub use plan::{BenchPlan, Trial, TrialScope};
pub use runner::{PlanIntrospector, TrialOutcome, TrialReport, run_plan};
pub use templates::{NamedQuery, default_templates};
