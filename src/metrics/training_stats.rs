//! Training statistics tracking for DQN
//!
//! Tracks per-episode scores, rewards and lengths, plus the loss of the
//! end-of-episode replay update.

use std::collections::VecDeque;

/// Training statistics tracker
///
/// The mean score is cumulative over all episodes, which is the number the
/// run log and training curve report. Rewards, lengths and losses use a
/// rolling window for smoothed progress lines.
///
/// # Example
///
/// ```rust
/// use dqn_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// stats.record_episode(2, 9.0, 150);
/// stats.record_episode(0, -10.0, 40);
/// stats.record_loss(3.5);
///
/// assert_eq!(stats.mean_score(), 1.0);
/// assert_eq!(stats.best_score(), 2);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode scores (rolling window)
    recent_scores: VecDeque<u32>,

    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Replay update losses (rolling window)
    losses: VecDeque<f32>,

    /// Sum of all episode scores
    total_score: u64,

    /// Highest single-episode score
    best_score: u32,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new training statistics tracker
    ///
    /// `window_size` is the number of recent values kept for rolling averages.
    pub fn new(window_size: usize) -> Self {
        Self {
            recent_scores: VecDeque::with_capacity(window_size),
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            losses: VecDeque::with_capacity(window_size),
            total_score: 0,
            best_score: 0,
            total_episodes: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    pub fn record_episode(&mut self, score: u32, reward: f32, length: usize) {
        Self::push_deque(&mut self.recent_scores, score, self.window_size);
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        self.total_score += u64::from(score);
        self.best_score = self.best_score.max(score);
        self.total_episodes += 1;
        self.total_steps += length;
    }

    /// Record the loss of a replay update
    pub fn record_loss(&mut self, loss: f32) {
        Self::push_deque(&mut self.losses, loss, self.window_size);
    }

    /// Mean score over every recorded episode
    pub fn mean_score(&self) -> f32 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_score as f32 / self.total_episodes as f32
        }
    }

    /// Mean score over the rolling window
    pub fn mean_recent_score(&self) -> f32 {
        let sum: u32 = self.recent_scores.iter().sum();
        if self.recent_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.recent_scores.len() as f32
        }
    }

    /// Mean episode reward over the rolling window
    pub fn mean_episode_reward(&self) -> f32 {
        self.mean(&self.episode_rewards)
    }

    /// Mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    /// Mean replay loss over the rolling window
    pub fn mean_loss(&self) -> f32 {
        self.mean(&self.losses)
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a one-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Mean score: {:.2} | Recent: {:.2} | Best: {} | Reward: {:.2} | Len: {:.1} | Loss: {:.4}",
            self.total_episodes,
            self.total_steps,
            self.mean_score(),
            self.mean_recent_score(),
            self.best_score,
            self.mean_episode_reward(),
            self.mean_episode_length(),
            self.mean_loss(),
        )
    }

    fn mean(&self, deque: &VecDeque<f32>) -> f32 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f32>() / deque.len() as f32
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = TrainingStats::new(100);
        assert_eq!(stats.window_size(), 100);
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.total_steps(), 0);
        assert_eq!(stats.best_score(), 0);
    }

    #[test]
    fn test_record_episode() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(3, 20.0, 50);

        assert_eq!(stats.total_episodes(), 1);
        assert_eq!(stats.total_steps(), 50);
        assert_eq!(stats.best_score(), 3);
        assert!((stats.mean_score() - 3.0).abs() < 1e-5);
        assert!((stats.mean_episode_reward() - 20.0).abs() < 1e-5);
        assert!((stats.mean_episode_length() - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_mean_score_is_cumulative() {
        let mut stats = TrainingStats::new(2);

        stats.record_episode(1, 0.0, 10);
        stats.record_episode(2, 0.0, 10);
        stats.record_episode(6, 0.0, 10);

        // Cumulative: (1 + 2 + 6) / 3, window: (2 + 6) / 2
        assert!((stats.mean_score() - 3.0).abs() < 1e-5);
        assert!((stats.mean_recent_score() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_best_score_never_decreases() {
        let mut stats = TrainingStats::new(10);

        for score in [2, 5, 1, 0, 4] {
            stats.record_episode(score, 0.0, 1);
        }

        assert_eq!(stats.best_score(), 5);
    }

    #[test]
    fn test_rolling_loss() {
        let mut stats = TrainingStats::new(2);

        stats.record_loss(0.1);
        stats.record_loss(0.2);
        assert!((stats.mean_loss() - 0.15).abs() < 1e-5);

        stats.record_loss(0.3);
        assert!((stats.mean_loss() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(5, 15.5, 150);
        stats.record_loss(0.02);

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Mean score: 5.00"));
        assert!(summary.contains("Best: 5"));
        assert!(summary.contains("Reward: 15.50"));
        assert!(summary.contains("Len: 150.0"));
        assert!(summary.contains("Loss: 0.0200"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = TrainingStats::new(100);

        assert_eq!(stats.mean_score(), 0.0);
        assert_eq!(stats.mean_recent_score(), 0.0);
        assert_eq!(stats.mean_episode_reward(), 0.0);
        assert_eq!(stats.mean_episode_length(), 0.0);
        assert_eq!(stats.mean_loss(), 0.0);
    }
}
