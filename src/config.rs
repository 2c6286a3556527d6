use crate::error::ScopeBenchError;
use crate::query::expr::DEFAULT_MAX_EXPR_DEPTH;
use crate::query::render::ExplainOptions;
use crate::scope::sample::SamplingMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scope sizes exercised by a full benchmark run.
pub const DEFAULT_SCOPE_SIZES: [usize; 8] = [10, 20, 50, 100, 200, 500, 1000, 2000];

/// Runtime configuration for a benchmark plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Requested sample sizes, one trial per size and mode.
    pub scope_sizes: Vec<usize>,
    pub modes: Vec<SamplingMode>,
    /// Also plan each template without any scope restriction.
    pub include_baseline: bool,
    pub explain: ExplainOptions,
    pub max_expr_depth: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            scope_sizes: DEFAULT_SCOPE_SIZES.to_vec(),
            modes: vec![SamplingMode::Ordered, SamplingMode::PseudoRandom],
            include_baseline: true,
            explain: ExplainOptions::default(),
            max_expr_depth: DEFAULT_MAX_EXPR_DEPTH,
        }
    }
}

impl BenchConfig {
    /// Small sizes for quick checks against a development database.
    pub fn smoke() -> Self {
        Self {
            scope_sizes: vec![1, 5, 10],
            ..Self::default()
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, ScopeBenchError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ScopeBenchError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), ScopeBenchError> {
        if self.scope_sizes.is_empty() {
            return Err(invalid("scope_sizes must not be empty"));
        }
        if self.scope_sizes.contains(&0) {
            return Err(invalid("scope_sizes must be positive"));
        }
        if self.modes.is_empty() {
            return Err(invalid("at least one sampling mode is required"));
        }
        if self.max_expr_depth == 0 {
            return Err(invalid("max_expr_depth must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ScopeBenchError {
    ScopeBenchError::InvalidConfig {
        message: message.to_string(),
    }
}
