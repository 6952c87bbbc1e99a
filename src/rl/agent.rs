//! Epsilon-greedy DQN agent
//!
//! Ties together the Q-network trainer, the replay memory and the exploration
//! schedule. The agent knows nothing about the game itself: it consumes
//! observations and emits action indices.

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    tensor::backend::{AutodiffBackend, Backend},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::path::Path;

use super::config::DqnConfig;
use super::memory::{ReplayMemory, Transition};
use super::network::{QNetwork, QNetworkConfig};
use super::observation::{Observation, observations_to_tensor};
use super::persistence::{self, CheckpointMetadata};
use super::trainer::QTrainer;
use crate::game::RelativeAction;

/// Index of the first maximum in `values`
///
/// Ties resolve to the lowest index. Returns 0 for an empty slice.
pub fn first_argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Evaluate the network on a single observation
pub fn q_values<B: Backend>(
    network: &QNetwork<B>,
    observation: &Observation,
    device: &B::Device,
) -> Vec<f32> {
    let input = observations_to_tensor::<B>(&[*observation], device);
    network
        .forward(input)
        .into_data()
        .to_vec()
        .expect("Failed to convert q-values to vec")
}

/// Action with the highest predicted value
pub fn greedy_action<B: Backend>(
    network: &QNetwork<B>,
    observation: &Observation,
    device: &B::Device,
) -> usize {
    first_argmax(&q_values(network, observation, device))
}

/// DQN agent with epsilon-greedy exploration
///
/// # Example
///
/// ```rust
/// use dqn_snake::rl::{DqnAgent, DqnConfig, TrainingBackend, default_device};
///
/// let mut agent = DqnAgent::<TrainingBackend>::with_seed(DqnConfig::default(), default_device(), 7);
/// let action = agent.get_action(&[0.0; 11]);
/// assert!(action < 3);
/// ```
pub struct DqnAgent<B: AutodiffBackend> {
    trainer: QTrainer<B>,
    memory: ReplayMemory,
    config: DqnConfig,
    epsilon: f64,
    episodes_trained: usize,
    rng: StdRng,
    device: B::Device,
}

impl<B: AutodiffBackend> DqnAgent<B> {
    /// Create an agent with freshly initialised weights
    ///
    /// Exploration draws from an entropy-seeded RNG. Weight initialisation
    /// uses the backend's own RNG, which is left as is; use
    /// [`DqnAgent::with_seed`] for reproducible weights.
    pub fn new(config: DqnConfig, device: B::Device) -> Self {
        Self::with_rng(config, device, StdRng::from_entropy())
    }

    /// Create an agent whose weights and exploration are reproducible
    pub fn with_seed(config: DqnConfig, device: B::Device, seed: u64) -> Self {
        B::seed(seed);
        Self::with_rng(config, device, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: DqnConfig, device: B::Device, rng: StdRng) -> Self {
        config.validate().expect("Invalid DQN configuration");

        let network = QNetworkConfig::new()
            .with_hidden_size(config.hidden_size)
            .init::<B>(&device);
        let trainer = QTrainer::new(network, config.learning_rate, config.gamma, device.clone());

        Self {
            trainer,
            memory: ReplayMemory::new(config.memory_capacity),
            epsilon: config.epsilon_start,
            config,
            episodes_trained: 0,
            rng,
            device,
        }
    }

    /// Choose an action index for `observation`
    ///
    /// With probability epsilon the action is uniform over the three choices,
    /// otherwise it is the greedy action.
    pub fn get_action(&mut self, observation: &Observation) -> usize {
        if self.rng.r#gen::<f64>() < self.epsilon {
            self.rng.gen_range(0..RelativeAction::COUNT)
        } else {
            self.greedy_action(observation)
        }
    }

    /// Action with the highest predicted value, ignoring epsilon
    pub fn greedy_action(&self, observation: &Observation) -> usize {
        greedy_action(&self.trainer.network().valid(), observation, &self.device)
    }

    /// Predicted values for the three actions
    pub fn q_values(&self, observation: &Observation) -> Vec<f32> {
        q_values(&self.trainer.network().valid(), observation, &self.device)
    }

    /// Store a transition in replay memory
    pub fn remember(&mut self, transition: Transition) {
        self.memory.remember(transition);
    }

    /// Single-transition update, run after every step
    pub fn train_short_memory(&mut self, transition: &Transition) -> f32 {
        self.trainer.train_step(
            &[transition.state],
            &[transition.action],
            &[transition.reward],
            &[transition.next_state],
            &[transition.done],
        )
    }

    /// Batch update from replay memory, run at the end of each episode
    ///
    /// Returns `None` when the memory is empty.
    pub fn train_long_memory(&mut self) -> Option<f32> {
        if self.memory.is_empty() {
            return None;
        }

        let batch = self.memory.sample(self.config.batch_size, &mut self.rng);

        let mut states = Vec::with_capacity(batch.len());
        let mut actions = Vec::with_capacity(batch.len());
        let mut rewards = Vec::with_capacity(batch.len());
        let mut next_states = Vec::with_capacity(batch.len());
        let mut dones = Vec::with_capacity(batch.len());
        for transition in &batch {
            states.push(transition.state);
            actions.push(transition.action);
            rewards.push(transition.reward);
            next_states.push(transition.next_state);
            dones.push(transition.done);
        }

        Some(
            self.trainer
                .train_step(&states, &actions, &rewards, &next_states, &dones),
        )
    }

    /// Apply one step of multiplicative epsilon decay, floored at `epsilon_end`
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_end);
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate, clamped to [0, 1]
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn increment_episode(&mut self) {
        self.episodes_trained += 1;
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn network(&self) -> &QNetwork<B> {
        self.trainer.network()
    }

    /// Gradient steps taken so far
    pub fn updates(&self) -> usize {
        self.trainer.updates()
    }

    /// Write weights and metadata under `path`
    pub fn save_checkpoint(&self, path: &Path, best_score: u32) -> Result<()> {
        let metadata = CheckpointMetadata::new(
            self.config.clone(),
            self.episodes_trained,
            best_score,
            self.epsilon,
        );
        persistence::save_checkpoint(self.trainer.network(), &metadata, path)
    }

    /// Replace the weights with those stored under `path`
    ///
    /// A missing checkpoint is not an error: the agent keeps its current
    /// weights and `Ok(None)` is returned. Exploration state is not restored.
    pub fn load_checkpoint(&mut self, path: &Path) -> Result<Option<CheckpointMetadata>> {
        let network = self.trainer.network().clone();
        let Some(network) = persistence::load_network(network, path, &self.device)? else {
            return Ok(None);
        };
        self.trainer.set_network(network);

        let metadata = persistence::load_metadata(path)?;
        if let Some(metadata) = &metadata {
            self.episodes_trained = metadata.episodes_trained;
        }
        Ok(Some(metadata.unwrap_or_else(|| {
            CheckpointMetadata::new(self.config.clone(), self.episodes_trained, 0, self.epsilon)
        })))
    }
}
