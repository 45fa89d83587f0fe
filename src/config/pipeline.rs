// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of most common words used as features
pub const DEFAULT_NUM_FEATURES: usize = 2000;
/// Leading fraction of every split that is used
pub const DEFAULT_DATASET_FRACTION: f64 = 0.01;
/// Output width of the reducer
pub const DEFAULT_COMPONENTS: usize = 150;
pub const DEFAULT_HIDDEN: usize = 32;
pub const DEFAULT_EPOCHS: usize = 10;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_MOMENTUM: f64 = 0.1;
pub const DEFAULT_WEIGHT_DECAY: f64 = 0.01;
pub const DEFAULT_POWER_ITERATIONS: usize = 3;
pub const DEFAULT_OVERSAMPLES: usize = 10;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// The knobs of the feature pipeline and the trainer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename(serialize = "Pipeline"))]
pub struct PipelineConfig {
    /// The number of most common words in the corpus to use as features (K)
    #[serde(default = "_default_num_features")]
    pub num_features: usize,
    /// The fraction of every split to use, in (0, 1]
    #[serde(default = "_default_dataset_fraction")]
    pub dataset_fraction: f64,
    /// The number of components of the PCA (C)
    #[serde(default = "_default_components")]
    pub components: usize,
    /// The number of hidden units of the classifier
    #[serde(default = "_default_hidden")]
    pub hidden: usize,
    /// The number of training epochs (E)
    #[serde(default = "_default_epochs")]
    pub epochs: usize,
    /// Seed for the randomized PCA, the weight init and the sample shuffling
    #[serde(default = "_default_seed")]
    pub seed: u64,
    #[serde(default = "_default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "_default_momentum")]
    pub momentum: f64,
    #[serde(default = "_default_weight_decay")]
    pub weight_decay: f64,
    /// Subspace iterations of the randomized range finder
    #[serde(default = "_default_power_iterations")]
    pub power_iterations: usize,
    /// Additional random directions sampled by the range finder
    #[serde(default = "_default_oversamples")]
    pub oversamples: usize,
    /// Evaluate the validation split after every epoch of the build branch
    #[serde(default)]
    pub evaluate_each_epoch: bool,
    /// Log extraction progress every n documents, 0 disables it
    #[serde(default = "_default_progress_interval")]
    pub progress_interval: usize,
}

const fn _default_num_features() -> usize {
    DEFAULT_NUM_FEATURES
}
const fn _default_dataset_fraction() -> f64 {
    DEFAULT_DATASET_FRACTION
}
const fn _default_components() -> usize {
    DEFAULT_COMPONENTS
}
const fn _default_hidden() -> usize {
    DEFAULT_HIDDEN
}
const fn _default_epochs() -> usize {
    DEFAULT_EPOCHS
}
const fn _default_seed() -> u64 {
    DEFAULT_SEED
}
const fn _default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}
const fn _default_momentum() -> f64 {
    DEFAULT_MOMENTUM
}
const fn _default_weight_decay() -> f64 {
    DEFAULT_WEIGHT_DECAY
}
const fn _default_power_iterations() -> usize {
    DEFAULT_POWER_ITERATIONS
}
const fn _default_oversamples() -> usize {
    DEFAULT_OVERSAMPLES
}
const fn _default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_features: _default_num_features(),
            dataset_fraction: _default_dataset_fraction(),
            components: _default_components(),
            hidden: _default_hidden(),
            epochs: _default_epochs(),
            seed: _default_seed(),
            learning_rate: _default_learning_rate(),
            momentum: _default_momentum(),
            weight_decay: _default_weight_decay(),
            power_iterations: _default_power_iterations(),
            oversamples: _default_oversamples(),
            evaluate_each_epoch: false,
            progress_interval: _default_progress_interval(),
        }
    }
}

/// A value of the [PipelineConfig] that can not be used
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineConfigError {
    #[error("The dataset fraction has to be in (0, 1] but was {0}.")]
    InvalidFraction(f64),
    #[error("The value of {0} has to be greater than zero.")]
    Zero(&'static str),
    #[error("The number of components ({components}) exceeds the number of features ({num_features}).")]
    ComponentsExceedFeatures {
        components: usize,
        num_features: usize,
    },
}

impl PipelineConfig {
    /// Checks the values that would otherwise fail deep inside the pipeline.
    pub fn validate(&self) -> Result<(), PipelineConfigError> {
        if !(self.dataset_fraction > 0.0 && self.dataset_fraction <= 1.0) {
            return Err(PipelineConfigError::InvalidFraction(self.dataset_fraction));
        }
        for (name, value) in [
            ("num_features", self.num_features),
            ("components", self.components),
            ("hidden", self.hidden),
            ("epochs", self.epochs),
        ] {
            if value == 0 {
                return Err(PipelineConfigError::Zero(name));
            }
        }
        if self.components > self.num_features {
            return Err(PipelineConfigError::ComponentsExceedFeatures {
                components: self.components,
                num_features: self.num_features,
            });
        }
        Ok(())
    }
}
