//! Backend type aliases and device management
//!
//! This module provides convenient type aliases for the Burn backends used in
//! training and inference, as well as helper functions for device management.
//!
//! # Backend Selection
//!
//! - **TrainingBackend**: Autodiff-enabled NdArray backend for training (CPU)
//! - **InferenceBackend**: Plain NdArray backend for inference (CPU)
//!
//! The Q-network is three small dense layers over an 11-float input, so the
//! CPU backend is plenty.
//!
//! # Example
//!
//! ```rust
//! use dqn_snake::rl::{QNetworkConfig, TrainingBackend, default_device};
//!
//! let device = default_device();
//! let network = QNetworkConfig::new().init::<TrainingBackend>(&device);
//! ```

use burn::backend::{
    Autodiff,
    ndarray::{NdArray, NdArrayDevice},
};

/// Backend type for training (with autodiff)
///
/// Used by the DQN agent and trainer. Tracks gradients for the Adam updates.
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
///
/// Used by play mode to run a loaded network without gradient tracking.
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
///
/// Returns the default NdArray device (CPU).
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
