use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::{debug, info};

use crate::activation::Activation;
use crate::config::{BiasMode, TrainingConfig};
use crate::error::{ensure_dim, Error, Result};
use crate::loss;

const ACTIVATION: Activation = Activation::Sigmoid;
const SCALED_BIAS_VALUE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Uninitialized,
    Initialized,
    Training,
    Trained,
}

/// Trainable parameters of the neuron.
///
/// The logit is `weights · x + bias_value * bias_scale`. `bias_value` is fixed
/// for the lifetime of the model; gradient descent only moves `bias_scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub weights: Array1<f64>,
    pub bias_value: f64,
    pub bias_scale: f64,
}

impl Parameters {
    pub fn effective_bias(&self) -> f64 {
        self.bias_value * self.bias_scale
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Array1<f64>,
    pub bias_scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub epoch: usize,
    pub cost: f64,
    pub mean_activation: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    entries: Vec<HistoryEntry>,
}

impl TrainingHistory {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    pub final_cost: f64,
    /// `100 - mean(|activation - label|) * 100` over the last forward pass.
    pub accuracy: f64,
}

#[derive(Debug, Clone)]
struct ForwardCache {
    logits: Array1<f64>,
    activation: Array1<f64>,
}

/// A single sigmoid unit trained with full-batch gradient descent.
pub struct LogisticClassifier {
    config: TrainingConfig,
    parameters: Option<Parameters>,
    cache: Option<ForwardCache>,
    cost: Option<f64>,
    history: TrainingHistory,
    state: ModelState,
    epoch: usize,
}

impl LogisticClassifier {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            parameters: None,
            cache: None,
            cost: None,
            history: TrainingHistory::default(),
            state: ModelState::Uninitialized,
            epoch: 0,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Epochs completed in the current training run.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Cost computed by the most recent forward pass.
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    /// Activation computed by the most recent forward pass.
    pub fn activation(&self) -> Option<&Array1<f64>> {
        self.cache.as_ref().map(|cache| &cache.activation)
    }

    /// Draws weights from `N(0, 1) * sqrt(2 / sample_count)` and resets the bias.
    pub fn initialize(&mut self, feature_dim: usize, sample_count: usize) -> Result<&Parameters> {
        if sample_count == 0 {
            return Err(Error::EmptyDataset("training".to_string()));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scale = (2.0 / sample_count as f64).sqrt();
        let weights = Array1::from_iter(
            (0..feature_dim).map(|_| rng.sample::<f64, _>(StandardNormal) * scale),
        );

        let bias_value = match self.config.bias_mode {
            BiasMode::Scaled => SCALED_BIAS_VALUE,
            BiasMode::Direct => 1.0,
        };

        self.cache = None;
        self.cost = None;
        self.epoch = 0;
        self.state = ModelState::Initialized;

        Ok(&*self.parameters.insert(Parameters {
            weights,
            bias_value,
            bias_scale: 0.0,
        }))
    }

    /// Computes the activation and cost for `features` of shape (F, N) against
    /// `labels` of length N, caching both for [`Self::backward`].
    pub fn forward(
        &mut self,
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
    ) -> Result<(Array1<f64>, f64)> {
        let logits = self.logits(features)?;
        ensure_dim("forward labels", features.ncols(), labels.len())?;

        let activation = ACTIVATION.apply(&logits);
        let cost = loss::cost(labels.len(), labels, activation.view());

        self.cost = Some(cost);
        self.cache = Some(ForwardCache {
            logits,
            activation: activation.clone(),
        });

        Ok((activation, cost))
    }

    /// Backpropagates the cached forward pass and applies one gradient step.
    ///
    /// The bias gradient is `sum(dz)` regardless of `bias_value`.
    pub fn backward(
        &mut self,
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
    ) -> Result<Gradients> {
        let cache = self.cache.as_ref().ok_or(Error::NoForwardPass)?;
        let parameters = self.parameters.as_mut().ok_or(Error::NotInitialized)?;

        ensure_dim("backward features", parameters.weights.len(), features.nrows())?;
        ensure_dim("backward samples", cache.logits.len(), features.ncols())?;
        ensure_dim("backward labels", cache.logits.len(), labels.len())?;

        let dz = loss::cost_derivative(labels.len(), labels, cache.activation.view())
            * ACTIVATION.derivative(&cache.logits);
        let gradients = Gradients {
            weights: features.dot(&dz),
            bias_scale: dz.sum(),
        };

        let learning_rate = self.config.learning_rate;
        parameters
            .weights
            .scaled_add(-learning_rate, &gradients.weights);
        parameters.bias_scale -= learning_rate * gradients.bias_scale;

        Ok(gradients)
    }

    /// Runs the configured number of full-batch epochs on a fresh
    /// initialization, clearing any previous history.
    pub fn train(
        &mut self,
        features: ArrayView2<f64>,
        labels: ArrayView1<f64>,
    ) -> Result<TrainingReport> {
        ensure_dim("training labels", features.ncols(), labels.len())?;

        self.history.clear();
        self.initialize(features.nrows(), features.ncols())?;

        let epochs = self.config.epochs;
        info!(
            epochs,
            learning_rate = self.config.learning_rate,
            features = features.nrows(),
            samples = features.ncols(),
            "starting training"
        );

        let mut last = None;
        for epoch in 0..epochs {
            self.state = ModelState::Training;

            let (activation, cost) = self.forward(features, labels)?;
            self.backward(features, labels)?;

            let accuracy = training_accuracy(activation.view(), labels);
            debug!(epoch, cost, accuracy, "epoch complete");

            if epoch.checked_rem(self.config.history_interval) == Some(0) {
                let mean_activation = activation.mean().unwrap_or(f64::NAN);
                self.history.push(HistoryEntry {
                    epoch,
                    cost,
                    mean_activation,
                });
                info!(epoch, cost, mean_activation, "training progress");
            }

            self.epoch = epoch + 1;
            last = Some((activation, cost));
        }

        let (activation, final_cost) = match last {
            Some(last) => last,
            None => self.forward(features, labels)?,
        };
        let accuracy = training_accuracy(activation.view(), labels);

        self.state = ModelState::Trained;
        info!(final_cost, accuracy, "training finished");

        Ok(TrainingReport {
            epochs,
            final_cost,
            accuracy,
        })
    }

    /// Sigmoid output for every column of `features`.
    pub fn probabilities(&self, features: ArrayView2<f64>) -> Result<Array1<f64>> {
        Ok(ACTIVATION.apply(&self.logits(features)?))
    }

    /// Labels each sample 1 when its probability is strictly above `threshold`.
    pub fn predict(&self, features: ArrayView2<f64>, threshold: f64) -> Result<Array1<u8>> {
        let probabilities = self.probabilities(features)?;

        Ok(probabilities.mapv(|probability| u8::from(probability > threshold)))
    }

    fn logits(&self, features: ArrayView2<f64>) -> Result<Array1<f64>> {
        let parameters = self.parameters.as_ref().ok_or(Error::NotInitialized)?;
        ensure_dim("feature dimension", parameters.weights.len(), features.nrows())?;

        Ok(parameters.weights.dot(&features) + parameters.effective_bias())
    }
}

/// Threshold-free accuracy proxy: `100 - mean(|activation - label|) * 100`.
pub fn training_accuracy(activation: ArrayView1<f64>, labels: ArrayView1<f64>) -> f64 {
    let error = (&activation - &labels).mapv(f64::abs).mean().unwrap_or(f64::NAN);

    100.0 - error * 100.0
}
