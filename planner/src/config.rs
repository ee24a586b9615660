//! Planner configuration, typically stored next to the agent's domain as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// What to do when the executor reaches a task it cannot run: a primitive
/// task without an operator, or a compound task left in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingOperatorPolicy {
    /// Drop the task and keep running the rest of the plan.
    #[default]
    Skip,
    /// Treat the task as failed and discard the whole plan.
    Abort,
}

/// Planner configuration (TOML).
///
/// Missing fields default to the lenient behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Plan completions inside a single tick that are followed by a full extra
    /// pass. Past this, the engine is still consulted but the new plan starts
    /// on the next call. Values below 1 act as 1.
    pub max_chained_plans: u32,

    pub missing_operator: MissingOperatorPolicy,

    /// Run plan shape checks whenever a new plan is adopted and log anomalies.
    pub validate_plans: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_chained_plans: 16,
            missing_operator: MissingOperatorPolicy::Skip,
            validate_plans: true,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_chained_plans == 0 {
            return Err(anyhow!("max_chained_plans must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PlannerConfig::default()`.
pub fn load_config(path: &Path) -> Result<PlannerConfig> {
    if !path.exists() {
        let cfg = PlannerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PlannerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
