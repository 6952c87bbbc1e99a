use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::{Direction, GameState};

/// Number of features in an observation
pub const OBSERVATION_SIZE: usize = 11;

/// Feature vector describing the game from the head's point of view
///
/// Layout:
/// - 0..3: danger straight / right / left, relative to the heading
/// - 3..7: heading one-hot (right, down, left, up)
/// - 7..11: food is right of / left of / below / above the head
pub type Observation = [f32; OBSERVATION_SIZE];

/// Create the 11-feature observation for a game state
///
/// Safe to call on terminal states, including ones where the head is off-grid.
pub fn create_observation(state: &GameState) -> Observation {
    let head = state.snake.head();
    let heading = state.snake.direction;
    let food = state.food;

    let danger = |direction: Direction| state.is_collision(head.moved_in_direction(direction));

    let features = [
        danger(heading),
        danger(heading.clockwise()),
        danger(heading.counter_clockwise()),
        heading == Direction::Right,
        heading == Direction::Down,
        heading == Direction::Left,
        heading == Direction::Up,
        food.x > head.x,
        food.x < head.x,
        food.y > head.y,
        food.y < head.y,
    ];

    features.map(|flag| if flag { 1.0 } else { 0.0 })
}

/// Stack observations into a `[batch, 11]` tensor
pub fn observations_to_tensor<B: Backend>(
    observations: &[Observation],
    device: &B::Device,
) -> Tensor<B, 2> {
    let data: Vec<f32> = observations.iter().flatten().copied().collect();
    Tensor::from_data(
        TensorData::new(data, [observations.len(), OBSERVATION_SIZE]),
        device,
    )
}
