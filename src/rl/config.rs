//! DQN hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the DQN agent
///
/// # Example
///
/// ```rust
/// use dqn_snake::rl::DqnConfig;
///
/// let config = DqnConfig {
///     batch_size: 64,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 1e-3
    pub learning_rate: f64,

    /// Discount factor applied to the best next-state value
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Exploration rate at the start of training
    ///
    /// Default: 1.0
    pub epsilon_start: f64,

    /// Lower bound for the exploration rate
    ///
    /// Default: 0.01
    pub epsilon_end: f64,

    /// Multiplicative exploration decay applied after each episode
    ///
    /// Default: 0.995
    pub epsilon_decay: f64,

    /// Replay memory capacity
    ///
    /// Default: 100_000
    pub memory_capacity: usize,

    /// Number of transitions sampled for the end-of-episode update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Width of the two hidden layers
    ///
    /// Default: 256
    pub hidden_size: usize,
}

impl DqnConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Exploration rate after `episodes` decay steps from `epsilon_start`
    pub fn epsilon_after(&self, episodes: u32) -> f64 {
        (0..episodes).fold(self.epsilon_start, |epsilon, _| {
            (epsilon * self.epsilon_decay).max(self.epsilon_end)
        })
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(format!(
                "epsilon_start must be in [0, 1], got {}",
                self.epsilon_start
            ));
        }

        if !(0.0..=1.0).contains(&self.epsilon_end) || self.epsilon_end > self.epsilon_start {
            return Err(format!(
                "epsilon_end must be in [0, epsilon_start], got {}",
                self.epsilon_end
            ));
        }

        if self.epsilon_decay <= 0.0 || self.epsilon_decay > 1.0 {
            return Err(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }

        if self.memory_capacity == 0 {
            return Err("memory_capacity must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.hidden_size == 0 {
            return Err("hidden_size must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.9,
            epsilon_start: 1.0,
            epsilon_end: 0.01,
            epsilon_decay: 0.995,
            memory_capacity: 100_000,
            batch_size: 1000,
            hidden_size: 256,
        }
    }
}
