//! Q-network for the Snake DQN agent
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: [batch, 3] action values (straight, turn right, turn left)
//! ```
//!
//! Checkpoints store the weights under the field names `fc1`, `fc2` and
//! `output`, so any network built from the same dimensions can load them.
//!
//! # Example
//!
//! ```rust
//! use dqn_snake::rl::QNetworkConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = QNetworkConfig::new().init::<Backend>(&device);
//!
//! let observations = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(observations);
//!
//! assert_eq!(q_values.dims(), [4, 3]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};
use serde::{Deserialize, Serialize};

use super::observation::OBSERVATION_SIZE;
use crate::game::RelativeAction;

/// Configuration for the Q-network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QNetworkConfig {
    /// Observation width (default: 11)
    pub input_size: usize,

    /// Width of both hidden layers (default: 256)
    pub hidden_size: usize,

    /// Number of action values produced (default: 3)
    pub num_actions: usize,
}

impl QNetworkConfig {
    /// Create a configuration with the standard Snake dimensions
    pub fn new() -> Self {
        Self {
            input_size: OBSERVATION_SIZE,
            hidden_size: 256,
            num_actions: RelativeAction::COUNT,
        }
    }

    /// Override the hidden layer width
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    /// Initialize the network with fresh random weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, self.num_actions).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed-forward Q-value approximator
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    /// Input layer: 11 → hidden
    pub(crate) fc1: Linear<B>,
    /// Hidden layer: hidden → hidden
    pub(crate) fc2: Linear<B>,
    /// Output layer: hidden → 3 action values
    pub(crate) output: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Evaluate action values for a batch of observations
    ///
    /// Takes `[batch, 11]` and returns `[batch, 3]`. Has no side effects.
    pub fn forward(&self, observations: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(observations));
        let x = relu(self.fc2.forward(x));
        self.output.forward(x)
    }
}
