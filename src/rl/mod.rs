//! Reinforcement learning components for the Snake agent
//!
//! Provides:
//! - 11-feature observations and the agent-facing environment
//! - Q-network and its temporal-difference trainer
//! - Replay memory and the epsilon-greedy DQN agent
//! - Checkpoint persistence

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod memory;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod trainer;

pub use agent::{DqnAgent, first_argmax, greedy_action, q_values};
pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use config::DqnConfig;
pub use environment::{SnakeEnvironment, StepOutcome};
pub use memory::{ReplayMemory, Transition};
pub use network::{QNetwork, QNetworkConfig};
pub use observation::{OBSERVATION_SIZE, Observation, create_observation, observations_to_tensor};
pub use persistence::{CheckpointMetadata, load_metadata, load_network, save_checkpoint};
pub use trainer::{QTrainer, TrainingBatch, td_targets};
