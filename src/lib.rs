//! DQN Snake - a Snake game with a deep Q-learning agent
//!
//! This library provides:
//! - Core game logic as a pure state transition (game module)
//! - Observations, Q-network, replay memory, trainer and agent (rl module)
//! - Training statistics, run log and training curve (metrics module)
//! - Training and play drivers (modes module)

pub mod game;
pub mod metrics;
pub mod modes;
pub mod rl;
