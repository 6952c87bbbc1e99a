//! Temporal-difference update rule for the Q-network
//!
//! For each transition the regression target is
//!
//! ```text
//! target = r                              if done
//! target = r + γ * max_a Q(s', a)         otherwise
//! ```
//!
//! The next-state values are detached from the autodiff graph, so gradients
//! only flow through `Q(s, ·)`. Only the slot of the action actually taken is
//! pushed toward the target; the other slots are regressed onto their own
//! (detached) prediction and contribute zero error.

use burn::{
    nn::loss::{MseLoss, Reduction},
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{
        Bool, ElementConversion, Int, Tensor, TensorData,
        backend::{AutodiffBackend, Backend},
    },
};

use super::network::QNetwork;
use super::observation::{Observation, observations_to_tensor};
use crate::game::RelativeAction;

/// A batch of transitions laid out as tensors
pub struct TrainingBatch<B: Backend> {
    /// Observations before the action [batch, 11]
    pub states: Tensor<B, 2>,
    /// Observations after the action [batch, 11]
    pub next_states: Tensor<B, 2>,
    /// Rewards [batch, 1]
    pub rewards: Tensor<B, 2>,
    /// 1.0 where the episode continues, 0.0 where it ended [batch, 1]
    pub continues: Tensor<B, 2>,
    /// True at the taken action of each row [batch, 3]
    pub action_mask: Tensor<B, 2, Bool>,
}

impl<B: Backend> TrainingBatch<B> {
    /// Build a batch from per-transition columns
    ///
    /// # Panics
    ///
    /// Panics if the batch is empty, if the five columns differ in length, or
    /// if an action index is outside `0..3`. These are caller bugs, not
    /// runtime conditions.
    pub fn new(
        states: &[Observation],
        actions: &[usize],
        rewards: &[f32],
        next_states: &[Observation],
        dones: &[bool],
        device: &B::Device,
    ) -> Self {
        let batch_size = states.len();
        assert!(batch_size > 0, "training batch must not be empty");
        assert_eq!(
            actions.len(),
            batch_size,
            "actions has {} entries but states has {}",
            actions.len(),
            batch_size
        );
        assert_eq!(
            rewards.len(),
            batch_size,
            "rewards has {} entries but states has {}",
            rewards.len(),
            batch_size
        );
        assert_eq!(
            next_states.len(),
            batch_size,
            "next_states has {} entries but states has {}",
            next_states.len(),
            batch_size
        );
        assert_eq!(
            dones.len(),
            batch_size,
            "dones has {} entries but states has {}",
            dones.len(),
            batch_size
        );

        let num_actions = RelativeAction::COUNT;
        let mut one_hot = vec![0i32; batch_size * num_actions];
        for (row, &action) in actions.iter().enumerate() {
            assert!(
                action < num_actions,
                "action {} at row {} is outside 0..{}",
                action,
                row,
                num_actions
            );
            one_hot[row * num_actions + action] = 1;
        }

        let continues: Vec<f32> = dones
            .iter()
            .map(|&done| if done { 0.0 } else { 1.0 })
            .collect();

        Self {
            states: observations_to_tensor(states, device),
            next_states: observations_to_tensor(next_states, device),
            rewards: Tensor::from_data(TensorData::new(rewards.to_vec(), [batch_size, 1]), device),
            continues: Tensor::from_data(TensorData::new(continues, [batch_size, 1]), device),
            action_mask: Tensor::<B, 2, Int>::from_data(
                TensorData::new(one_hot, [batch_size, num_actions]),
                device,
            )
            .equal_elem(1),
        }
    }

    /// Number of transitions in the batch
    pub fn len(&self) -> usize {
        self.states.dims()[0]
    }

    /// Always false; empty batches are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build regression targets from current predictions and next-state values
///
/// `q_pred` should already be detached; it supplies the targets for the
/// actions that were not taken.
pub fn td_targets<B: Backend>(
    q_pred: Tensor<B, 2>,
    q_next: Tensor<B, 2>,
    batch: &TrainingBatch<B>,
    gamma: f32,
) -> Tensor<B, 2> {
    let [_, num_actions] = q_pred.dims();

    let best_next = q_next.max_dim(1); // [batch, 1]
    let td = batch.rewards.clone() + best_next * batch.continues.clone() * gamma;

    q_pred.mask_where(batch.action_mask.clone(), td.repeat_dim(1, num_actions))
}

/// Gradient-descent trainer owning the Q-network and its Adam optimizer
pub struct QTrainer<B: AutodiffBackend> {
    network: QNetwork<B>,
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    learning_rate: f64,
    gamma: f32,
    updates: usize,
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    /// Create a trainer for `network`
    pub fn new(network: QNetwork<B>, learning_rate: f64, gamma: f32, device: B::Device) -> Self {
        Self {
            network,
            optim: AdamConfig::new().init(),
            learning_rate,
            gamma,
            updates: 0,
            device,
        }
    }

    /// Perform one Adam step on a batch of transitions
    ///
    /// The batch may hold a single transition. Returns the mean squared error
    /// before the step.
    ///
    /// # Panics
    ///
    /// Panics on malformed input, see [`TrainingBatch::new`].
    pub fn train_step(
        &mut self,
        states: &[Observation],
        actions: &[usize],
        rewards: &[f32],
        next_states: &[Observation],
        dones: &[bool],
    ) -> f32 {
        let batch = TrainingBatch::<B>::new(states, actions, rewards, next_states, dones, &self.device);
        self.train_batch(&batch)
    }

    /// Perform one Adam step on a prepared batch
    pub fn train_batch(&mut self, batch: &TrainingBatch<B>) -> f32 {
        let loss = self.loss(batch);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.network);
        self.network = self
            .optim
            .step(self.learning_rate, self.network.clone(), grads);
        self.updates += 1;

        loss_value
    }

    /// Mean squared TD error of the current parameters on `batch`
    ///
    /// Gradients flow only through `Q(s, ·)`; the next-state values and the
    /// targets of the untaken actions are constants.
    pub fn loss(&self, batch: &TrainingBatch<B>) -> Tensor<B, 1> {
        let q_pred = self.network.forward(batch.states.clone());
        let q_next = self.network.forward(batch.next_states.clone()).detach();

        let targets = td_targets(q_pred.clone().detach(), q_next, batch, self.gamma);
        MseLoss::new().forward(q_pred, targets, Reduction::Mean)
    }

    /// Get a reference to the Q-network
    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    /// Replace the Q-network, e.g. after loading a checkpoint
    pub fn set_network(&mut self, network: QNetwork<B>) {
        self.network = network;
    }

    /// Number of gradient steps taken
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Discount factor
    pub fn gamma(&self) -> f32 {
        self.gamma
    }
}
