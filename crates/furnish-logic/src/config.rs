//! Planner tuning: retry budgets, wall tolerances, walker size, grid step.
//!
//! All fields have defaults, so a partial JSON document such as
//! `{"placement": {"global_attempts": 100}}` is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

/// Budgets and tolerances for the placement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Full restarts before giving up.
    pub global_attempts: u32,
    /// Random poses tried per item within one attempt.
    pub item_trials: u32,
    /// Rotations are drawn from multiples of this step in [0, 360).
    pub rotation_step_deg: u32,
    /// Gap left between a wall-touching item and its wall.
    pub wall_margin_m: f32,
    /// Maximum allowed distance between a touching face and its wall.
    pub wall_epsilon_m: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            global_attempts: 60,
            item_trials: 800,
            rotation_step_deg: 30,
            wall_margin_m: 0.01,
            wall_epsilon_m: 0.02,
        }
    }
}

impl PlacementConfig {
    /// The discrete rotation set, e.g. 0, 30, ..., 330.
    pub fn rotations(&self) -> Vec<f32> {
        let step = self.rotation_step_deg.clamp(1, 360);
        (0..360).step_by(step as usize).map(|d| d as f32).collect()
    }
}

/// Footprint of the walking agent, meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSize {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub depth: f32,
    pub height: f32,
}

impl Default for AgentSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            depth: 1.0,
            height: 1.8,
        }
    }
}

/// Settings for the walkability grid and approach targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub agent: AgentSize,
    /// Edge length of one square grid cell.
    pub cell_size_m: f32,
    /// Extra distance beyond half the agent depth at which approach targets
    /// sit from an item's edge.
    pub approach_margin_m: f32,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            agent: AgentSize::default(),
            cell_size_m: 0.1,
            approach_margin_m: 0.05,
        }
    }
}

impl AccessConfig {
    /// Distance from an item's footprint edge to its approach target.
    pub fn approach_offset(&self) -> f32 {
        self.agent.depth / 2.0 + self.approach_margin_m
    }
}

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub placement: PlacementConfig,
    pub access: AccessConfig,
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the planner meaningless.
    pub fn validate(&self) -> Result<()> {
        let p = &self.placement;
        if p.item_trials == 0 {
            return Err(PlacementError::InvalidConfig("item_trials must be at least 1".into()));
        }
        if p.rotation_step_deg == 0 || p.rotation_step_deg > 360 {
            return Err(PlacementError::InvalidConfig(format!(
                "rotation_step_deg must be in 1..=360, got {}",
                p.rotation_step_deg
            )));
        }
        if !(p.wall_margin_m >= 0.0 && p.wall_margin_m < p.wall_epsilon_m) {
            return Err(PlacementError::InvalidConfig(format!(
                "wall margin {} must be non-negative and below the wall tolerance {}",
                p.wall_margin_m, p.wall_epsilon_m
            )));
        }
        let a = &self.access;
        if !(a.cell_size_m.is_finite() && a.cell_size_m > 0.0) {
            return Err(PlacementError::InvalidConfig(format!(
                "cell_size_m must be positive, got {}",
                a.cell_size_m
            )));
        }
        if a.agent.width < 0.0 || a.agent.depth < 0.0 || a.approach_margin_m < 0.0 {
            return Err(PlacementError::InvalidConfig(
                "agent size and approach margin must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
