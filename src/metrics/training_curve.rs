//! Score history written out as a JSON training curve

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the curve inside the log directory
pub const CURVE_FILE_NAME: &str = "training_curve.json";

/// Full per-episode score and running-mean histories
///
/// Both sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingCurve {
    scores: Vec<u32>,
    mean_scores: Vec<f32>,
}

impl TrainingCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one episode
    pub fn push(&mut self, score: u32, mean_score: f32) {
        self.scores.push(score);
        self.mean_scores.push(mean_score);
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn mean_scores(&self) -> &[f32] {
        &self.mean_scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Overwrite `path` with the full curve
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json = serde_json::to_string(self).context("Failed to serialize training curve")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write training curve to {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_push_keeps_lengths_equal() {
        let mut curve = TrainingCurve::new();
        assert!(curve.is_empty());

        curve.push(0, 0.0);
        curve.push(2, 1.0);

        assert_eq!(curve.len(), 2);
        assert_eq!(curve.scores(), &[0, 2]);
        assert_eq!(curve.mean_scores(), &[0.0, 1.0]);
    }

    #[test]
    fn test_json_layout() {
        let mut curve = TrainingCurve::new();
        curve.push(1, 1.0);
        curve.push(3, 2.0);

        let value = serde_json::to_value(&curve).unwrap();

        assert_eq!(value["scores"], serde_json::json!([1, 3]));
        assert_eq!(value["mean_scores"], serde_json::json!([1.0, 2.0]));
    }

    #[test]
    fn test_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join(CURVE_FILE_NAME);
        let mut curve = TrainingCurve::new();

        curve.push(1, 1.0);
        curve.write_json(&path).unwrap();
        curve.push(5, 3.0);
        curve.write_json(&path).unwrap();

        let restored: TrainingCurve =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, curve);
    }
}
