//! Checkpoint persistence for Q-network weights
//!
//! A checkpoint at `<path>` consists of two files:
//! - `<stem>.mpk` - network weights (Burn named MessagePack record)
//! - `<stem>.meta.json` - training metadata as JSON
//!
//! Loading from a path with no weights file is not an error. The caller gets
//! `Ok(None)` and keeps its freshly initialised network.

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config::DqnConfig;
use super::network::QNetwork;

/// Metadata saved next to the weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Hyperparameters the network was trained with
    pub dqn_config: DqnConfig,

    /// Number of episodes trained when the checkpoint was written
    pub episodes_trained: usize,

    /// Best single-episode score seen so far
    pub best_score: u32,

    /// Exploration rate at save time
    pub epsilon: f64,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl CheckpointMetadata {
    pub fn new(
        dqn_config: DqnConfig,
        episodes_trained: usize,
        best_score: u32,
        epsilon: f64,
    ) -> Self {
        Self {
            dqn_config,
            episodes_trained,
            best_score,
            epsilon,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// File the weights of the checkpoint at `path` live in
pub fn weights_path(path: &Path) -> PathBuf {
    path.with_extension("mpk")
}

/// File the metadata of the checkpoint at `path` lives in
pub fn metadata_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

/// Save network weights, overwriting any previous checkpoint
///
/// Creates parent directories if they don't exist.
pub fn save_network<B: Backend>(network: &QNetwork<B>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(network.clone().into_record(), weights_path(path))
        .context("Failed to save network weights")?;

    Ok(())
}

/// Save metadata as pretty-printed JSON
pub fn save_metadata(metadata: &CheckpointMetadata, path: &Path) -> Result<()> {
    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Save weights and metadata together
pub fn save_checkpoint<B: Backend>(
    network: &QNetwork<B>,
    metadata: &CheckpointMetadata,
    path: &Path,
) -> Result<()> {
    save_network(network, path)?;
    save_metadata(metadata, path)?;

    tracing::debug!(path = %weights_path(path).display(), "checkpoint written");
    Ok(())
}

/// Load weights into `network`
///
/// `network` must have the same layer dimensions as the saved one. Returns
/// `Ok(None)` when no weights file exists at `path`.
pub fn load_network<B: Backend>(
    network: QNetwork<B>,
    path: &Path,
    device: &B::Device,
) -> Result<Option<QNetwork<B>>> {
    let weights = weights_path(path);
    if !weights.exists() {
        tracing::warn!(path = %weights.display(), "no checkpoint found, keeping current weights");
        return Ok(None);
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(weights.clone(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", weights))?;

    Ok(Some(network.load_record(record)))
}

/// Load metadata, if the sidecar file exists
pub fn load_metadata(path: &Path) -> Result<Option<CheckpointMetadata>> {
    let meta_path = metadata_path(path);
    if !meta_path.exists() {
        return Ok(None);
    }

    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    Ok(Some(metadata))
}
