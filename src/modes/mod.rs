//! Execution modes: training the agent and watching it play

pub mod play;
pub mod train;

pub use play::{PlayConfig, PlayMode};
pub use train::{EpisodeSummary, TrainConfig, TrainMode};
