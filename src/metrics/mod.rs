//! Training metrics: statistics, the per-episode run log and the score curve

pub mod run_log;
pub mod training_curve;
pub mod training_stats;

pub use run_log::{EpisodeRecord, RunLogger};
pub use training_curve::{CURVE_FILE_NAME, TrainingCurve};
pub use training_stats::TrainingStats;
