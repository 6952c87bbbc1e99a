//! Per-episode CSV run log
//!
//! Each training run appends one row per episode to `run_<unix-seconds>.csv`
//! in the log directory:
//!
//! ```text
//! episode,score,mean_score,epsilon,reward
//! 1,0,0.000,0.9950,-10.00
//! 2,1,0.500,0.9900,0.00
//! ```

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const HEADER: &str = "episode,score,mean_score,epsilon,reward";

/// One row of the run log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRecord {
    /// 1-based episode index
    pub episode: usize,
    /// Food eaten during the episode
    pub score: u32,
    /// Mean score over all episodes so far
    pub mean_score: f32,
    /// Exploration rate after the episode's decay
    pub epsilon: f64,
    /// Sum of step rewards during the episode
    pub reward: f32,
}

impl EpisodeRecord {
    fn to_csv_row(self) -> String {
        format!(
            "{},{},{:.3},{:.4},{:.2}",
            self.episode, self.score, self.mean_score, self.epsilon, self.reward
        )
    }
}

/// Append-only CSV writer for episode records
#[derive(Debug)]
pub struct RunLogger {
    path: PathBuf,
}

impl RunLogger {
    /// Create a new run log in `dir`, named after the current time
    pub fn create(dir: &Path) -> Result<Self> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::create_at(dir.join(format!("run_{}.csv", secs)))
    }

    /// Create a run log at an explicit path, truncating any existing file
    pub fn create_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create run log at {:?}", path))?;
        writeln!(file, "{}", HEADER)?;
        file.flush()?;

        tracing::info!(path = %path.display(), "run log created");
        Ok(Self { path })
    }

    /// Append one episode row
    pub fn log(&self, record: &EpisodeRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open run log at {:?}", self.path))?;
        writeln!(file, "{}", record.to_csv_row())
            .with_context(|| format!("Failed to append to run log at {:?}", self.path))?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
