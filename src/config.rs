//! Run configuration loaded from JSON.
//!
//! Every field has a default matching the cat vs non-cat run (5000 epochs,
//! learning rate 0.01, threshold 0.3), so an empty object `{}` is a valid
//! configuration.
//!
//! ```json
//! {
//!   "train_set": "datasets/train_catvnoncat.csv",
//!   "test_set": "datasets/test_catvnoncat.csv",
//!   "plot_dir": "plots",
//!   "training": { "epochs": 2000, "learning_rate": 0.005, "seed": 7 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// How the bias term enters the logit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasMode {
    /// `effective_bias = 0.1 * bias_scale`, with only `bias_scale` trained.
    ///
    /// Equivalent to a single trainable bias whose updates are damped by the
    /// constant factor 0.1.
    #[default]
    Scaled,
    /// A single trainable scalar bias, initialized to zero.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Probability strictly above which a sample is labelled 1.
    pub threshold: f64,
    /// Epoch spacing between training history samples.
    pub history_interval: usize,
    /// Seed for weight initialization; entropy is used when absent.
    pub seed: Option<u64>,
    pub bias_mode: BiasMode,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 5000,
            learning_rate: 0.01,
            threshold: 0.3,
            history_interval: 100,
            seed: None,
            bias_mode: BiasMode::Scaled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub train_set: PathBuf,
    pub test_set: PathBuf,
    /// Directory for diagnostic charts; no charts are drawn when unset.
    pub plot_dir: Option<PathBuf>,
    /// Class names indexed by label value.
    pub classes: Vec<String>,
    pub training: TrainingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            train_set: PathBuf::from("datasets/train_catvnoncat.csv"),
            test_set: PathBuf::from("datasets/test_catvnoncat.csv"),
            plot_dir: None,
            classes: vec!["non-cat".to_string(), "cat".to_string()],
            training: TrainingConfig::default(),
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config = serde_json::from_str(&contents)?;

    Ok(config)
}
