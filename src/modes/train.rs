//! Training mode for the DQN agent
//!
//! Each episode runs the agent in the Snake environment until termination.
//! Every step stores the transition and performs a single-transition update;
//! the end of the episode triggers a replay update and one epsilon decay.
//! Whenever an episode beats the best score so far, the weights are saved.
//!
//! # Example
//!
//! ```rust,no_run
//! use dqn_snake::modes::{TrainConfig, TrainMode};
//! use dqn_snake::rl::{TrainingBackend, default_device};
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(500, PathBuf::from("models/model.mpk"));
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device());
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::PathBuf;

use crate::game::GameConfig;
use crate::metrics::{CURVE_FILE_NAME, EpisodeRecord, RunLogger, TrainingCurve, TrainingStats};
use crate::rl::{DqnAgent, DqnConfig, SnakeEnvironment, Transition};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Where the best-scoring weights are written
    pub checkpoint_path: PathBuf,

    /// Load weights from `checkpoint_path` before training
    pub load_checkpoint: bool,

    /// Directory for the run log and training curve, `None` disables both
    pub log_dir: Option<PathBuf>,

    /// Rewrite the training curve every N episodes, 0 writes it only at the end
    pub curve_frequency: usize,

    /// Print training progress every N episodes, 0 disables progress lines
    pub log_frequency: usize,

    /// Seed for the environment and agent, entropy when `None`
    pub seed: Option<u64>,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// DQN hyperparameters
    pub dqn_config: DqnConfig,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    ///
    /// ```rust
    /// use dqn_snake::modes::TrainConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = TrainConfig::new(500, PathBuf::from("models/model.mpk"));
    /// assert_eq!(config.curve_frequency, 10);
    /// ```
    pub fn new(num_episodes: usize, checkpoint_path: PathBuf) -> Self {
        Self {
            num_episodes,
            checkpoint_path,
            load_checkpoint: false,
            log_dir: Some(PathBuf::from("logs")),
            curve_frequency: 10,
            log_frequency: 10,
            seed: None,
            game_config: GameConfig::default(),
            dqn_config: DqnConfig::default(),
        }
    }
}

/// Result of a single training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub score: u32,
    pub reward: f32,
    pub steps: usize,
}

/// Training mode for the DQN agent
pub struct TrainMode<B: AutodiffBackend> {
    agent: DqnAgent<B>,
    env: SnakeEnvironment,
    stats: TrainingStats,
    curve: TrainingCurve,
    config: TrainConfig,

    /// Best episode score, including one restored from a loaded checkpoint
    best_score: u32,

    /// Checkpoint writes that failed and were skipped
    failed_saves: usize,
}

impl<B: AutodiffBackend> TrainMode<B> {
    /// Create a new training mode
    pub fn new(config: TrainConfig, device: B::Device) -> Self {
        let (agent, env) = match config.seed {
            Some(seed) => (
                DqnAgent::with_seed(config.dqn_config.clone(), device, seed),
                SnakeEnvironment::with_seed(config.game_config.clone(), seed),
            ),
            None => (
                DqnAgent::new(config.dqn_config.clone(), device),
                SnakeEnvironment::new(config.game_config.clone()),
            ),
        };

        Self {
            agent,
            env,
            stats: TrainingStats::new(100),
            curve: TrainingCurve::new(),
            config,
            best_score: 0,
            failed_saves: 0,
        }
    }

    /// Run the training loop
    ///
    /// Checkpoint save failures are logged and counted, not returned. Run log
    /// and training curve I/O failures abort training.
    pub fn run(&mut self) -> Result<()> {
        if self.config.load_checkpoint {
            self.load_checkpoint()?;
        }

        self.print_header();

        let run_log = match &self.config.log_dir {
            Some(dir) => Some(RunLogger::create(dir)?),
            None => None,
        };

        for episode in 1..=self.config.num_episodes {
            let summary = self.run_episode();

            if let Some(loss) = self.agent.train_long_memory() {
                self.stats.record_loss(loss);
            }
            self.agent.decay_epsilon();
            self.agent.increment_episode();

            self.stats
                .record_episode(summary.score, summary.reward, summary.steps);
            self.curve.push(summary.score, self.stats.mean_score());

            if summary.score > self.best_score {
                self.best_score = summary.score;
                self.save_checkpoint();
            }

            if let Some(run_log) = &run_log {
                run_log.log(&EpisodeRecord {
                    episode,
                    score: summary.score,
                    mean_score: self.stats.mean_score(),
                    epsilon: self.agent.epsilon(),
                    reward: summary.reward,
                })?;
            }

            if self.config.curve_frequency > 0 && episode % self.config.curve_frequency == 0 {
                self.write_curve()?;
            }

            if self.config.log_frequency > 0 && episode % self.config.log_frequency == 0 {
                self.print_progress(episode);
            }
        }

        self.write_curve()?;

        println!("\nTraining complete!");
        println!("Best score: {}", self.best_score);
        if self.failed_saves > 0 {
            println!("Failed checkpoint saves: {}", self.failed_saves);
        }
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Run a single training episode
    ///
    /// Each step is applied in order: environment step, transition stored,
    /// single-transition update.
    pub fn run_episode(&mut self) -> EpisodeSummary {
        let mut obs = self.env.reset();
        let mut reward = 0.0;
        let mut steps = 0;

        loop {
            let action = self.agent.get_action(&obs);
            let outcome = self.env.step(action);

            let transition =
                Transition::new(obs, action, outcome.reward, outcome.observation, outcome.done);
            self.agent.remember(transition);
            self.agent.train_short_memory(&transition);

            reward += outcome.reward;
            steps += 1;
            obs = outcome.observation;

            if outcome.done {
                return EpisodeSummary {
                    score: outcome.score,
                    reward,
                    steps,
                };
            }
        }
    }

    fn load_checkpoint(&mut self) -> Result<()> {
        let path = &self.config.checkpoint_path;
        let metadata = self
            .agent
            .load_checkpoint(path)
            .with_context(|| format!("Failed to load checkpoint from {:?}", path))?;

        if let Some(metadata) = metadata {
            self.best_score = metadata.best_score;
            tracing::info!(
                path = %path.display(),
                episodes_trained = metadata.episodes_trained,
                best_score = metadata.best_score,
                "checkpoint loaded"
            );
        }

        Ok(())
    }

    fn save_checkpoint(&mut self) {
        let path = &self.config.checkpoint_path;
        match self.agent.save_checkpoint(path, self.best_score) {
            Ok(()) => {
                tracing::info!(path = %path.display(), score = self.best_score, "new best checkpoint saved");
            }
            Err(err) => {
                self.failed_saves += 1;
                tracing::error!(path = %path.display(), error = ?err, "failed to save checkpoint");
            }
        }
    }

    fn write_curve(&self) -> Result<()> {
        if let Some(dir) = &self.config.log_dir {
            self.curve.write_json(&dir.join(CURVE_FILE_NAME))?;
        }
        Ok(())
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn curve(&self) -> &TrainingCurve {
        &self.curve
    }

    pub fn agent(&self) -> &DqnAgent<B> {
        &self.agent
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn failed_saves(&self) -> usize {
        self.failed_saves
    }

    fn print_header(&self) {
        let dqn = &self.config.dqn_config;
        println!("{}", "=".repeat(70));
        println!("DQN Training - Snake");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Game Config: {}x{} grid",
            self.config.game_config.grid_width, self.config.game_config.grid_height
        );
        println!("DQN Config:");
        println!("  Learning rate: {}", dqn.learning_rate);
        println!("  Gamma: {}", dqn.gamma);
        println!(
            "  Epsilon: {} -> {} (x{} per episode)",
            self.agent.epsilon(),
            dqn.epsilon_end,
            dqn.epsilon_decay
        );
        println!("  Memory capacity: {}", dqn.memory_capacity);
        println!("  Batch size: {}", dqn.batch_size);
        println!("  Hidden size: {}", dqn.hidden_size);
        println!("Checkpoint path: {:?}", self.config.checkpoint_path);
        if let Some(dir) = &self.config.log_dir {
            println!("Log directory: {:?}", dir);
        }
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] eps {:.4} | {}",
            episode,
            self.config.num_episodes,
            self.agent.epsilon(),
            self.stats.format_summary()
        );
    }
}
