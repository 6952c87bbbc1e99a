use anyhow::Result;
use clap::{Parser, ValueEnum};
use dqn_snake::game::GameConfig;
use dqn_snake::modes::{PlayConfig, PlayMode, TrainConfig, TrainMode};
use dqn_snake::rl::{InferenceBackend, TrainingBackend, default_device};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dqn_snake")]
#[command(version, about = "Snake game agent trained with Deep Q-Learning")]
struct Cli {
    /// Whether to train the agent or watch it play
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// Number of training episodes
    #[arg(long, default_value = "500")]
    episodes: usize,

    /// Number of games to play in play mode (0 = until Ctrl+C)
    #[arg(long, default_value = "0")]
    games: usize,

    /// Load the checkpoint before training
    #[arg(long)]
    load: bool,

    /// Grid width
    #[arg(long, default_value = "26")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Checkpoint path for saving and loading weights
    #[arg(long, default_value = "models/model.mpk")]
    model_path: PathBuf,

    /// Directory for the run log and training curve
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Delay between steps in play mode, in milliseconds
    #[arg(long, default_value = "0")]
    delay_ms: u64,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Train the agent, saving the best-scoring weights
    Train,
    /// Play greedily with saved weights
    Play,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();

    let game_config = GameConfig::new(cli.width, cli.height);
    game_config
        .validate()
        .map_err(|msg| anyhow::anyhow!("Invalid game configuration: {}", msg))?;

    match cli.mode {
        Mode::Train => {
            let mut config = TrainConfig::new(cli.episodes, cli.model_path);
            config.load_checkpoint = cli.load;
            config.log_dir = Some(cli.log_dir);
            config.seed = cli.seed;
            config.game_config = game_config;

            let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device());
            train_mode.run()?;
        }
        Mode::Play => {
            let mut config = PlayConfig::new(cli.model_path);
            config.max_episodes = cli.games;
            config.step_delay_ms = cli.delay_ms;
            config.seed = cli.seed;
            config.game_config = game_config;

            let mut play_mode = PlayMode::<InferenceBackend>::new(config, default_device())?;
            play_mode.run().await?;
        }
    }

    Ok(())
}
