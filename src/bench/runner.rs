use crate::bench::plan::{BenchPlan, TrialScope};
use crate::error::ScopeBenchError;
use crate::query::value::Value;
use serde::Serialize;
use tracing::{info, warn};

/// Executes explain statements against a live database. Implemented outside
/// this crate; the plan runner only needs the resulting plan lines.
pub trait PlanIntrospector {
    fn explain(&mut self, text: &str, params: &[Value]) -> Result<Vec<String>, ScopeBenchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialOutcome {
    Planned { plan: Vec<String> },
    Failed { code: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialReport {
    pub template: String,
    pub scope: TrialScope,
    pub outcome: TrialOutcome,
}

/// Runs every trial in order. A failing trial is recorded and the run moves
/// on to the next one.
pub fn run_plan<I: PlanIntrospector + ?Sized>(
    plan: &BenchPlan,
    introspector: &mut I,
) -> Vec<TrialReport> {
    let mut reports = Vec::with_capacity(plan.len());
    for trial in &plan.trials {
        info!(
            template = %trial.template,
            scope = %trial.scope,
            params = trial.statement.params.len(),
            "getting plan"
        );
        let outcome = match introspector.explain(&trial.statement.text, &trial.statement.params) {
            Ok(plan) => TrialOutcome::Planned { plan },
            Err(err) => {
                warn!(
                    template = %trial.template,
                    scope = %trial.scope,
                    error = %err,
                    "error querying for execution plan"
                );
                TrialOutcome::Failed {
                    code: err.code_str(),
                    message: err.to_string(),
                }
            }
        };
        reports.push(TrialReport {
            template: trial.template.clone(),
            scope: trial.scope,
            outcome,
        });
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::{PlanIntrospector, TrialOutcome, run_plan};
    use crate::bench::plan::BenchPlan;
    use crate::bench::templates::default_templates;
    use crate::config::BenchConfig;
    use crate::error::ScopeBenchError;
    use crate::query::value::Value;
    use crate::scope::inventory::NamespaceInventory;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(String, usize)>,
        fail_on_call: Option<usize>,
    }

    impl PlanIntrospector for Recorder {
        fn explain(&mut self, text: &str, params: &[Value]) -> Result<Vec<String>, ScopeBenchError> {
            self.seen.push((text.to_string(), params.len()));
            if self.fail_on_call == Some(self.seen.len()) {
                return Err(ScopeBenchError::Introspection("connection reset".into()));
            }
            Ok(vec![format!("Seq Scan ({} params)", params.len())])
        }
    }

    fn plan() -> BenchPlan {
        let inventory = NamespaceInventory::from_rows([("C1", "nsA"), ("C2", "nsB")]);
        BenchPlan::build(&BenchConfig::smoke(), &default_templates(), &inventory).expect("plan")
    }

    #[test]
    fn runs_every_trial_in_order() {
        let plan = plan();
        let mut recorder = Recorder::default();
        let reports = run_plan(&plan, &mut recorder);
        assert_eq!(reports.len(), plan.len());
        assert_eq!(recorder.seen.len(), plan.len());
        for (trial, (text, params)) in plan.trials.iter().zip(&recorder.seen) {
            assert_eq!(&trial.statement.text, text);
            assert_eq!(trial.statement.params.len(), *params);
        }
        assert!(
            reports
                .iter()
                .all(|r| matches!(r.outcome, TrialOutcome::Planned { .. }))
        );
    }

    #[test]
    fn failed_trial_does_not_stop_the_run() {
        let plan = plan();
        let mut recorder = Recorder {
            fail_on_call: Some(2),
            ..Recorder::default()
        };
        let reports = run_plan(&plan, &mut recorder);
        assert_eq!(reports.len(), plan.len());
        assert_eq!(
            reports[1].outcome,
            TrialOutcome::Failed {
                code: "introspection",
                message: "plan introspection failed: connection reset".into(),
            }
        );
        assert!(matches!(reports[2].outcome, TrialOutcome::Planned { .. }));
    }
}
