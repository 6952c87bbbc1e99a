use super::{
    action::{Direction, RelativeAction},
    config::GameConfig,
    state::{GameState, Position, Snake, TerminationCause},
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it did
    pub termination: Option<TerminationCause>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn terminal(reward: f32, cause: TerminationCause, ate_food: bool) -> Self {
        Self {
            reward,
            terminated: true,
            info: StepInfo {
                ate_food,
                termination: Some(cause),
            },
        }
    }
}

/// The game engine that handles all game logic
///
/// The engine owns the random source used for food placement. Given the same
/// seed and the same action sequence it reproduces the same game.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from system entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a new game engine with a fixed seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        config.validate().expect("Invalid game configuration");
        Self { config, rng }
    }

    /// Get the game configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self
            .spawn_food_avoid_snake(&snake)
            .expect("validated grid has a free cell at reset");

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Compute the state that follows `state` after taking `action`
    ///
    /// The input state is left untouched. Stepping a dead state returns it
    /// unchanged with a terminal result and zero reward.
    pub fn step(&mut self, state: &GameState, action: RelativeAction) -> (GameState, StepResult) {
        if !state.is_alive {
            return (
                state.clone(),
                StepResult {
                    reward: 0.0,
                    terminated: true,
                    info: StepInfo {
                        ate_food: false,
                        termination: None,
                    },
                },
            );
        }

        let mut next = state.clone();
        next.frames += 1;
        next.snake.direction = action.apply(state.snake.direction);

        let new_head = state.snake.head().moved_in_direction(next.snake.direction);
        next.snake.body.insert(0, new_head);

        if let Some(cause) = self.check_termination(&next, new_head) {
            // Undo the speculative growth so the length is unchanged
            next.snake.body.pop();
            next.is_alive = false;
            let result = StepResult::terminal(self.config.death_penalty, cause, false);
            return (next, result);
        }

        if new_head != next.food {
            next.snake.body.pop();
            let result = StepResult {
                reward: self.config.step_reward,
                terminated: false,
                info: StepInfo {
                    ate_food: false,
                    termination: None,
                },
            };
            return (next, result);
        }

        // Ate food: the tail stays, so the snake grows by one cell
        next.score += 1;
        match self.spawn_food_avoid_snake(&next.snake) {
            Some(food) => {
                next.food = food;
                let result = StepResult {
                    reward: self.config.food_reward,
                    terminated: false,
                    info: StepInfo {
                        ate_food: true,
                        termination: None,
                    },
                };
                (next, result)
            }
            None => {
                next.is_alive = false;
                let result = StepResult::terminal(
                    self.config.food_reward,
                    TerminationCause::BoardFull,
                    true,
                );
                (next, result)
            }
        }
    }

    /// Check whether the freshly prepended head ends the episode
    ///
    /// `state` already contains the new head, so the stall budget is measured
    /// against the grown length.
    fn check_termination(&self, state: &GameState, head: Position) -> Option<TerminationCause> {
        if !state.is_in_bounds(head) {
            return Some(TerminationCause::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(TerminationCause::SelfCollision);
        }

        let frame_budget = self.config.stall_factor * state.snake.len() as u32;
        if state.frames > frame_budget {
            return Some(TerminationCause::Stalled);
        }

        None
    }

    /// Pick a food cell uniformly among the cells not covered by the snake
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let free: Vec<Position> = (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.body.contains(pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    /// Snake of length 3 at the center of the default grid, heading right,
    /// with food tucked away in a corner
    fn centered_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(13, 10), Direction::Right, 3),
            Position::new(0, 0),
            26,
            20,
        )
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.frames, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(13, 10));
        assert_eq!(state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_reset_food_never_on_snake() {
        let mut engine = engine();
        for _ in 0..500 {
            let state = engine.reset();
            assert!(!state.is_occupied_by_snake(state.food));
            assert!(state.is_in_bounds(state.food));
        }
    }

    #[test]
    fn test_same_seed_same_food() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);
        for _ in 0..10 {
            assert_eq!(a.reset().food, b.reset().food);
        }
    }

    #[test]
    fn test_straight_steps_without_food() {
        let mut engine = engine();
        let mut state = centered_state();

        for step in 1..=3 {
            let (next, result) = engine.step(&state, RelativeAction::Straight);
            assert_eq!(result.reward, 0.0);
            assert!(!result.terminated);
            assert_eq!(next.snake.direction, Direction::Right);
            assert_eq!(next.snake.len(), 3);
            assert_eq!(next.snake.head(), Position::new(13 + step, 10));
            assert_eq!(next.frames, step as u32);
            state = next;
        }
    }

    #[test]
    fn test_step_leaves_input_untouched() {
        let mut engine = engine();
        let state = centered_state();
        let before = state.clone();

        let _ = engine.step(&state, RelativeAction::TurnRight);

        assert_eq!(state, before);
    }

    #[test]
    fn test_turns_rotate_heading() {
        let mut engine = engine();
        let state = centered_state();

        let (right, _) = engine.step(&state, RelativeAction::TurnRight);
        assert_eq!(right.snake.direction, Direction::Down);
        assert_eq!(right.snake.head(), Position::new(13, 11));

        let (left, _) = engine.step(&state, RelativeAction::TurnLeft);
        assert_eq!(left.snake.direction, Direction::Up);
        assert_eq!(left.snake.head(), Position::new(13, 9));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = centered_state();
        state.food = Position::new(14, 10);

        let (next, result) = engine.step(&state, RelativeAction::Straight);

        assert!(result.info.ate_food);
        assert!(!result.terminated);
        assert_eq!(result.reward, 10.0);
        assert_eq!(next.score, 1);
        assert_eq!(next.snake.len(), 4);
        assert_eq!(next.snake.body[3], Position::new(11, 10)); // tail kept
        assert!(!next.is_occupied_by_snake(next.food));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(24, 10), Direction::Right, 3),
            Position::new(0, 0),
            26,
            20,
        );

        let (next, result) = engine.step(&state, RelativeAction::Straight);
        assert!(!result.terminated);
        assert_eq!(result.reward, 0.0);
        let length_before = next.snake.len();
        state = next;

        let (next, result) = engine.step(&state, RelativeAction::Straight);
        assert!(result.terminated);
        assert_eq!(result.reward, -10.0);
        assert_eq!(result.info.termination, Some(TerminationCause::Wall));
        assert_eq!(next.snake.len(), length_before);
        assert!(!next.is_alive);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();

        // Body: (5,5), (4,5), (3,5), (2,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        // Right to (6,5), then three clockwise turns back onto the old tail cell
        for action in [
            RelativeAction::Straight,
            RelativeAction::TurnRight,
            RelativeAction::TurnRight,
        ] {
            let (next, result) = engine.step(&state, action);
            assert!(!result.terminated);
            state = next;
        }
        let (next, result) = engine.step(&state, RelativeAction::TurnRight);

        assert!(result.terminated);
        assert_eq!(result.reward, -10.0);
        assert_eq!(
            result.info.termination,
            Some(TerminationCause::SelfCollision)
        );
        assert_eq!(next.snake.len(), 4);
    }

    #[test]
    fn test_stall_terminates_episode() {
        let mut engine = engine();
        let mut state = centered_state();

        // Budget after the move is 100 * 4 cells
        state.frames = 399;
        let (_, result) = engine.step(&state, RelativeAction::Straight);
        assert!(!result.terminated);

        state.frames = 400;
        let (next, result) = engine.step(&state, RelativeAction::Straight);
        assert!(result.terminated);
        assert_eq!(result.reward, -10.0);
        assert_eq!(result.info.termination, Some(TerminationCause::Stalled));
        assert_eq!(next.snake.len(), 3);
    }

    #[test]
    fn test_board_full_ends_episode() {
        let mut engine = GameEngine::with_seed(GameConfig::new(4, 1), 1);
        let state = GameState::new(
            Snake::new(Position::new(2, 0), Direction::Right, 3),
            Position::new(3, 0),
            4,
            1,
        );

        let (next, result) = engine.step(&state, RelativeAction::Straight);

        assert!(result.terminated);
        assert!(result.info.ate_food);
        assert_eq!(result.reward, 10.0);
        assert_eq!(result.info.termination, Some(TerminationCause::BoardFull));
        assert_eq!(next.score, 1);
        assert_eq!(next.snake.len(), 4);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.is_alive = false;

        let (next, result) = engine.step(&state, RelativeAction::Straight);

        assert!(result.terminated);
        assert_eq!(result.reward, 0.0);
        assert_eq!(next, state);
    }
}
