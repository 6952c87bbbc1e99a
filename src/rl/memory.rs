//! Experience replay memory for DQN training
//!
//! A bounded first-in-first-out store of transitions. Once full, every insert
//! evicts the oldest transition. Sampling draws a uniform subset without
//! replacement, which breaks up the temporal correlation of consecutive steps.

use rand::{Rng, seq::index};
use std::collections::VecDeque;

use super::observation::Observation;

/// A single environment transition (s, a, r, s', done)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Observation before the action
    pub state: Observation,
    /// Discrete action index taken
    pub action: usize,
    /// Reward received
    pub reward: f32,
    /// Observation after the action
    pub next_state: Observation,
    /// Whether the episode ended on this step
    pub done: bool,
}

impl Transition {
    pub fn new(
        state: Observation,
        action: usize,
        reward: f32,
        next_state: Observation,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}

/// Bounded FIFO replay memory
///
/// # Example
///
/// ```rust
/// use dqn_snake::rl::{ReplayMemory, Transition};
///
/// let mut memory = ReplayMemory::new(2);
/// for reward in [1.0, 2.0, 3.0] {
///     memory.remember(Transition::new([0.0; 11], 0, reward, [0.0; 11], false));
/// }
///
/// assert_eq!(memory.len(), 2);
/// let rewards: Vec<f32> = memory.iter().map(|t| t.reward).collect();
/// assert_eq!(rewards, vec![2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    transitions: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    /// Create an empty memory holding at most `capacity` transitions
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay memory capacity must be at least 1");
        Self {
            transitions: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Store a transition, evicting the oldest one when full
    pub fn remember(&mut self, transition: Transition) {
        if self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Draw up to `batch_size` distinct transitions uniformly at random
    ///
    /// When fewer than `batch_size` transitions are stored, all of them are
    /// returned. The order of the returned transitions is unspecified.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<Transition> {
        if self.transitions.len() <= batch_size {
            return self.transitions.iter().copied().collect();
        }

        index::sample(rng, self.transitions.len(), batch_size)
            .into_iter()
            .map(|i| self.transitions[i])
            .collect()
    }

    /// Iterate over stored transitions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Number of stored transitions
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if the memory is empty
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Maximum number of stored transitions
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
