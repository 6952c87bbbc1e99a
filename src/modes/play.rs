//! Play mode for watching a trained agent
//!
//! Loads a checkpoint and plays episodes greedily (no exploration), printing
//! each episode's score. Steps can be paced with a fixed delay. Ctrl+C stops
//! the loop once the current episode has finished.
//!
//! # Example
//!
//! ```rust,no_run
//! use dqn_snake::modes::{PlayConfig, PlayMode};
//! use dqn_snake::rl::{InferenceBackend, default_device};
//! use std::path::PathBuf;
//!
//! # async fn play() -> anyhow::Result<()> {
//! let config = PlayConfig::new(PathBuf::from("models/model.mpk"));
//! let mut play_mode = PlayMode::<InferenceBackend>::new(config, default_device())?;
//! play_mode.run().await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::GameConfig;
use crate::rl::{QNetwork, QNetworkConfig, SnakeEnvironment, greedy_action, persistence};

/// Configuration for play mode
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Checkpoint to load
    pub checkpoint_path: PathBuf,

    /// Number of episodes to play, 0 plays until interrupted
    pub max_episodes: usize,

    /// Delay between steps, 0 runs unpaced
    pub step_delay_ms: u64,

    /// Seed for food placement, entropy when `None`
    pub seed: Option<u64>,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,
}

impl PlayConfig {
    pub fn new(checkpoint_path: PathBuf) -> Self {
        Self {
            checkpoint_path,
            max_episodes: 0,
            step_delay_ms: 0,
            seed: None,
            game_config: GameConfig::default(),
        }
    }
}

/// Greedy play mode
pub struct PlayMode<B: Backend> {
    network: QNetwork<B>,
    env: SnakeEnvironment,
    config: PlayConfig,
    device: B::Device,
    scores: Vec<u32>,
    stop_requested: Arc<AtomicBool>,
}

impl<B: Backend> PlayMode<B> {
    /// Create a play mode, loading weights from the configured checkpoint
    ///
    /// A missing checkpoint is reported and play proceeds with untrained
    /// weights.
    pub fn new(config: PlayConfig, device: B::Device) -> Result<Self> {
        let path = &config.checkpoint_path;

        let metadata = persistence::load_metadata(path)
            .with_context(|| format!("Failed to read checkpoint metadata for {:?}", path))?;
        let hidden_size = metadata
            .as_ref()
            .map_or(QNetworkConfig::new().hidden_size, |meta| meta.dqn_config.hidden_size);
        let network = QNetworkConfig::new()
            .with_hidden_size(hidden_size)
            .init::<B>(&device);

        let network = match persistence::load_network(network.clone(), path, &device)
            .with_context(|| format!("Failed to load model from {:?}", path))?
        {
            Some(loaded) => loaded,
            None => {
                println!("No checkpoint at {:?}, playing with untrained weights", path);
                network
            }
        };

        if let Some(metadata) = &metadata {
            println!("{}", "=".repeat(60));
            println!("Loaded Model Information");
            println!("{}", "=".repeat(60));
            println!("Model path: {:?}", path);
            println!("Episodes trained: {}", metadata.episodes_trained);
            println!("Best score: {}", metadata.best_score);
            println!("Version: {}", metadata.version);
            println!("{}", "=".repeat(60));
            println!();
        }

        let env = match config.seed {
            Some(seed) => SnakeEnvironment::with_seed(config.game_config.clone(), seed),
            None => SnakeEnvironment::new(config.game_config.clone()),
        };

        Ok(Self {
            network,
            env,
            config,
            device,
            scores: Vec::new(),
            stop_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Play episodes until the episode limit or Ctrl+C
    pub async fn run(&mut self) -> Result<()> {
        let stop_requested = Arc::clone(&self.stop_requested);
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop_requested.store(true, Ordering::SeqCst);
            }
        });

        let mut pacing = (self.config.step_delay_ms > 0).then(|| {
            let mut timer = interval(Duration::from_millis(self.config.step_delay_ms));
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        });

        loop {
            // Give the signal task a turn between episodes
            tokio::task::yield_now().await;
            if self.finished() {
                break;
            }

            let mut obs = self.env.reset();
            loop {
                if let Some(timer) = pacing.as_mut() {
                    timer.tick().await;
                }

                let action = greedy_action(&self.network, &obs, &self.device);
                let outcome = self.env.step(action);
                obs = outcome.observation;

                if outcome.done {
                    self.scores.push(outcome.score);
                    println!("Game {} Score {}", self.scores.len(), outcome.score);
                    break;
                }
            }
        }

        signal_task.abort();

        if self.stop_requested.load(Ordering::SeqCst) {
            tracing::info!(games = self.scores.len(), "interrupted, stopping play");
        }
        if let Some(best) = self.scores.iter().max() {
            println!("Played {} games, best score {}", self.scores.len(), best);
        }

        Ok(())
    }

    fn finished(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
            || (self.config.max_episodes > 0 && self.scores.len() >= self.config.max_episodes)
    }

    /// Ask the loop to stop at the next episode boundary
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Shared flag that stops the loop at the next episode boundary once set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_requested)
    }

    /// Scores of the completed episodes, in order
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{
        CheckpointMetadata, DqnConfig, InferenceBackend, default_device, save_checkpoint,
    };
    use tempfile::TempDir;

    fn play_config(path: PathBuf, episodes: usize) -> PlayConfig {
        let mut config = PlayConfig::new(path);
        config.max_episodes = episodes;
        config.seed = Some(8);
        config.game_config = GameConfig::small();
        config
    }

    #[tokio::test]
    async fn test_plays_requested_episodes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.mpk");
        let dqn_config = DqnConfig {
            hidden_size: 16,
            ..Default::default()
        };
        let network = QNetworkConfig::new()
            .with_hidden_size(16)
            .init::<InferenceBackend>(&default_device());
        save_checkpoint(
            &network,
            &CheckpointMetadata::new(dqn_config, 10, 2, 0.9),
            &path,
        )
        .unwrap();

        let mut play_mode =
            PlayMode::<InferenceBackend>::new(play_config(path, 3), default_device()).unwrap();
        play_mode.run().await.unwrap();

        assert_eq!(play_mode.scores().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_checkpoint_uses_fresh_weights() {
        let temp_dir = TempDir::new().unwrap();
        let config = play_config(temp_dir.path().join("absent.mpk"), 1);

        let mut play_mode = PlayMode::<InferenceBackend>::new(config, default_device()).unwrap();
        play_mode.run().await.unwrap();

        assert_eq!(play_mode.scores().len(), 1);
    }

    #[tokio::test]
    async fn test_stop_request_ends_before_next_episode() {
        let temp_dir = TempDir::new().unwrap();
        let config = play_config(temp_dir.path().join("absent.mpk"), 0);

        let mut play_mode = PlayMode::<InferenceBackend>::new(config, default_device()).unwrap();
        play_mode.request_stop();
        play_mode.run().await.unwrap();

        assert!(play_mode.scores().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_unpaced_play_sees_stop_from_another_task() {
        let temp_dir = TempDir::new().unwrap();
        let config = play_config(temp_dir.path().join("absent.mpk"), 0);

        let mut play_mode = PlayMode::<InferenceBackend>::new(config, default_device()).unwrap();
        let stop = play_mode.stop_handle();
        tokio::spawn(async move {
            stop.store(true, Ordering::SeqCst);
        });
        play_mode.run().await.unwrap();

        assert!(play_mode.scores().len() <= 1);
    }

    #[tokio::test]
    async fn test_paced_play() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = play_config(temp_dir.path().join("absent.mpk"), 1);
        config.step_delay_ms = 1;

        let mut play_mode = PlayMode::<InferenceBackend>::new(config, default_device()).unwrap();
        play_mode.run().await.unwrap();

        assert_eq!(play_mode.scores().len(), 1);
    }
}
