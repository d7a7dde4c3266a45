use serde::{Deserialize, Serialize};

use crate::error::{FSRSError, Result};

/// Shape of the forgetting curve used both to estimate retrievability and to
/// turn a stability into an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForgettingCurve {
    /// `R = (1 + 19/81 * t/S) ^ -0.5`, the curve the default weights are fitted to.
    #[default]
    Power,
    /// `R = 0.9 ^ (t/S)`.
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Empty for the defaults, 17 values for an FSRS 4.5 vector, or 19 values.
    pub parameters: Vec<f64>,
    pub requested_retention: f64,
    /// In days.
    pub maximum_interval: u32,
    /// In minutes. Empty means learning cards are scheduled in whole days.
    pub learning_steps: Vec<u32>,
    /// In minutes. Empty means relearning cards are scheduled in whole days.
    pub relearning_steps: Vec<u32>,
    pub forgetting_curve: ForgettingCurve,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            parameters: Vec::new(),
            requested_retention: 0.9,
            maximum_interval: 36500,
            learning_steps: vec![1, 10],
            relearning_steps: vec![10],
            forgetting_curve: ForgettingCurve::default(),
        }
    }
}

impl SchedulerConfig {
    /// Checks everything except the weight vector, which is validated when it
    /// is expanded into a model.
    pub fn validate(&self) -> Result<()> {
        let retention_ok =
            self.requested_retention > 0.0 && self.requested_retention < 1.0;
        if !retention_ok || self.maximum_interval == 0 {
            return Err(FSRSError::InvalidInput);
        }
        if self
            .learning_steps
            .iter()
            .chain(&self.relearning_steps)
            .any(|&minutes| minutes == 0)
        {
            return Err(FSRSError::InvalidInput);
        }
        Ok(())
    }
}
