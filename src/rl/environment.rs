use super::observation::{Observation, create_observation};
use crate::game::{GameConfig, GameEngine, GameState, RelativeAction, StepResult};

/// Outcome of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Observation of the state after the step
    pub observation: Observation,
    /// Reward for this step
    pub reward: f32,
    /// Whether the episode ended
    pub done: bool,
    /// Score after the step
    pub score: u32,
}

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and provides the agent-facing interface:
/// - 11-feature observations
/// - Discrete relative action space (0: straight, 1: turn right, 2: turn left)
/// - Standard RL interface (reset, step)
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
    last_step: Option<StepResult>,
}

impl SnakeEnvironment {
    /// Create a new Snake environment seeded from system entropy
    pub fn new(config: GameConfig) -> Self {
        Self::from_engine(GameEngine::new(config))
    }

    /// Create a new Snake environment with a fixed seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(GameEngine::with_seed(config, seed))
    }

    fn from_engine(mut engine: GameEngine) -> Self {
        let state = engine.reset();
        Self {
            engine,
            state,
            last_step: None,
        }
    }

    /// Reset the environment and return initial observation
    pub fn reset(&mut self) -> Observation {
        self.state = self.engine.reset();
        self.last_step = None;
        create_observation(&self.state)
    }

    /// Step the environment with a discrete action index
    ///
    /// # Panics
    ///
    /// Panics if `action_idx` is not one of 0, 1 or 2.
    pub fn step(&mut self, action_idx: usize) -> StepOutcome {
        let action = RelativeAction::from_index(action_idx)
            .unwrap_or_else(|| panic!("action index {action_idx} is outside 0..3"));

        let (next_state, step_result) = self.engine.step(&self.state, action);
        self.state = next_state;

        let outcome = StepOutcome {
            observation: create_observation(&self.state),
            reward: step_result.reward,
            done: step_result.terminated,
            score: self.state.score,
        };
        self.last_step = Some(step_result);

        outcome
    }

    /// Get current observation without stepping
    pub fn get_observation(&self) -> Observation {
        create_observation(&self.state)
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Result of the most recent step since the last reset
    pub fn last_step(&self) -> Option<&StepResult> {
        self.last_step.as_ref()
    }

    /// Replace the current state, e.g. to set up a specific scenario
    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
        self.last_step = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake, TerminationCause};

    #[test]
    fn test_environment_creation() {
        let env = SnakeEnvironment::with_seed(GameConfig::default(), 1);

        assert!(env.state().is_alive);
        assert_eq!(env.state().score, 0);
        assert_eq!(env.state().frames, 0);
        assert!(env.last_step().is_none());
    }

    #[test]
    fn test_reset_observation_heading_right() {
        let mut env = SnakeEnvironment::with_seed(GameConfig::default(), 1);

        let obs = env.reset();

        assert_eq!(&obs[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&obs[3..7], &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_step_updates_state() {
        let mut env = SnakeEnvironment::with_seed(GameConfig::small(), 3);
        env.reset();

        let outcome = env.step(0);

        assert_eq!(env.state().frames, 1);
        assert_eq!(outcome.observation, env.get_observation());
        assert_eq!(outcome.score, env.state().score);
        assert!(env.last_step().is_some());
    }

    #[test]
    #[should_panic(expected = "outside 0..3")]
    fn test_invalid_action_panics() {
        let mut env = SnakeEnvironment::with_seed(GameConfig::small(), 3);
        env.step(3);
    }

    #[test]
    fn test_food_reward() {
        let mut env = SnakeEnvironment::with_seed(GameConfig::default(), 5);
        env.set_state(GameState::new(
            Snake::new(Position::new(13, 10), Direction::Right, 3),
            Position::new(14, 10),
            26,
            20,
        ));

        let outcome = env.step(0);

        assert_eq!(outcome.reward, 10.0);
        assert_eq!(outcome.score, 1);
        assert!(!outcome.done);
        assert_eq!(env.state().snake.len(), 4);
    }

    #[test]
    fn test_wall_is_terminal() {
        let mut env = SnakeEnvironment::with_seed(GameConfig::default(), 5);
        env.set_state(GameState::new(
            Snake::new(Position::new(25, 10), Direction::Right, 3),
            Position::new(0, 0),
            26,
            20,
        ));

        let outcome = env.step(0);

        assert!(outcome.done);
        assert_eq!(outcome.reward, -10.0);
        assert_eq!(
            env.last_step().and_then(|step| step.info.termination),
            Some(TerminationCause::Wall)
        );
    }

    #[test]
    fn test_episodes_always_terminate() {
        let mut env = SnakeEnvironment::with_seed(GameConfig::small(), 11);

        for _ in 0..3 {
            env.reset();
            let mut done = false;
            let mut steps = 0;

            // Always turning right loops forever, so only the stall rule can end it
            while !done {
                done = env.step(1).done;
                steps += 1;
                assert!(steps <= 1_000);
            }
        }
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = SnakeEnvironment::with_seed(GameConfig::small(), 99);
        let mut b = SnakeEnvironment::with_seed(GameConfig::small(), 99);

        assert_eq!(a.reset(), b.reset());
        for action in [0, 1, 0, 2, 2, 0, 1] {
            assert_eq!(a.step(action), b.step(action));
        }
    }
}
