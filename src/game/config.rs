use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Rewards
    /// Reward for eating food
    pub food_reward: f32,
    /// Reward for dying (collision or stall)
    pub death_penalty: f32,
    /// Reward for any other step
    pub step_reward: f32,

    /// An episode stalls once its frame count exceeds `stall_factor * snake length`
    pub stall_factor: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 26,
            grid_height: 20,
            initial_snake_length: 3,
            food_reward: 10.0,
            death_penalty: -10.0,
            step_reward: 0.0,
            stall_factor: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The initial snake is laid out leftwards from the center
        if self.grid_width / 2 + 1 < self.initial_snake_length || self.grid_height == 0 {
            return Err(format!(
                "a {}x{} grid cannot hold an initial snake of length {}",
                self.grid_width, self.grid_height, self.initial_snake_length
            ));
        }

        // Food needs at least one free cell at reset
        if self.grid_width * self.grid_height <= self.initial_snake_length {
            return Err(format!(
                "a {}x{} grid leaves no room for food",
                self.grid_width, self.grid_height
            ));
        }

        if self.stall_factor == 0 {
            return Err("stall_factor must be at least 1".to_string());
        }

        Ok(())
    }
}
