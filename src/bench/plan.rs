use crate::bench::templates::NamedQuery;
use crate::config::BenchConfig;
use crate::error::ScopeBenchError;
use crate::query::render::RenderedStatement;
use crate::scope::inventory::NamespaceInventory;
use crate::scope::sample::{SamplingMode, select_namespaces};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialScope {
    /// Template planned as written.
    Baseline,
    Sampled {
        mode: SamplingMode,
        requested: usize,
        /// Entries actually sampled; below `requested` for small inventories.
        actual: usize,
    },
}

impl std::fmt::Display for TrialScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrialScope::Baseline => write!(f, "baseline"),
            TrialScope::Sampled {
                mode,
                requested,
                actual,
            } => write!(f, "{mode} {actual}/{requested}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
    pub template: String,
    pub scope: TrialScope,
    /// Explain-wrapped statement ready for execution.
    pub statement: RenderedStatement,
}

/// Every statement a benchmark run executes, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BenchPlan {
    pub trials: Vec<Trial>,
}

impl BenchPlan {
    /// For each template: the baseline (if enabled), then every configured
    /// mode in order with one trial per requested size.
    pub fn build(
        config: &BenchConfig,
        templates: &[NamedQuery],
        inventory: &NamespaceInventory,
    ) -> Result<Self, ScopeBenchError> {
        config.validate()?;
        for template in templates {
            template.query.validate(config.max_expr_depth)?;
        }
        if inventory.is_empty() {
            warn!("namespace inventory is empty, scoped trials will match the baseline");
        }

        let samples: Vec<(SamplingMode, Vec<_>)> = config
            .modes
            .iter()
            .map(|&mode| (mode, select_namespaces(inventory, &config.scope_sizes, mode)))
            .collect();

        let mut trials = Vec::new();
        for template in templates {
            if config.include_baseline {
                trials.push(Trial {
                    template: template.name.clone(),
                    scope: TrialScope::Baseline,
                    statement: template.query.render().explain(&config.explain),
                });
            }
            for (mode, per_size) in &samples {
                for (scope, &requested) in per_size.iter().zip(&config.scope_sizes) {
                    let scoped = template.query.with_scope(scope);
                    trials.push(Trial {
                        template: template.name.clone(),
                        scope: TrialScope::Sampled {
                            mode: *mode,
                            requested,
                            actual: scope.len(),
                        },
                        statement: scoped.render().explain(&config.explain),
                    });
                }
            }
        }
        debug!(
            templates = templates.len(),
            trials = trials.len(),
            clusters = inventory.cluster_count(),
            namespaces = inventory.namespace_count(),
            "built benchmark plan"
        );
        Ok(Self { trials })
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}
