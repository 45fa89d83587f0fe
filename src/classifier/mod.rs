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

//! The trainable classifier capability consumed by the pipeline.
//!
//! The pipeline only constructs a classifier, trains it epoch by epoch and asks
//! it for predictions. Everything else is up to the implementation.

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

pub mod dataset;
mod error;
pub mod network;
pub mod trainer;

pub use dataset::ClassificationDataset;
pub use error::ClassifierError;
pub use network::FeedForwardNetwork;
pub use trainer::Trainer;

/// The input, hidden and output width of a classifier
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ClassifierShape {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl ClassifierShape {
    pub const fn new(input: usize, hidden: usize, output: usize) -> Self {
        Self {
            input,
            hidden,
            output,
        }
    }
}

/// Hyperparameters of gradient based training
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerParams {
    pub learning_rate: f64,
    pub momentum: f64,
    pub weight_decay: f64,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            momentum: 0.1,
            weight_decay: 0.01,
        }
    }
}

/// A classifier that can be trained epoch by epoch.
///
/// The persisted state is the classifier itself. Everything that only matters
/// while training (e.g. momentum buffers) lives in [Self::TrainingState] and
/// is created fresh whenever a classifier is wrapped in a [Trainer].
pub trait TrainableClassifier: Sized {
    type TrainingState;

    /// Creates an untrained classifier, the seed determines the initial state.
    fn construct(shape: ClassifierShape, seed: u64) -> Self;

    fn shape(&self) -> ClassifierShape;

    fn fresh_training_state(&self) -> Self::TrainingState;

    /// Trains a single pass over `dataset` and returns the mean loss.
    fn train_epoch(
        &mut self,
        state: &mut Self::TrainingState,
        params: &TrainerParams,
        rng: &mut StdRng,
        dataset: &ClassificationDataset,
    ) -> Result<f64, ClassifierError>;

    /// The probability of every class, one row per input row.
    fn class_probabilities(&self, inputs: &Array2<f64>) -> Result<Array2<f64>, ClassifierError>;

    /// The most probable class of every sample.
    fn predict(&self, dataset: &ClassificationDataset) -> Result<Vec<usize>, ClassifierError> {
        let probabilities = self.class_probabilities(dataset.inputs())?;
        Ok(probabilities
            .axis_iter(Axis(0))
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0usize, f64::NEG_INFINITY), |best, (idx, &value)| {
                        if value > best.1 {
                            (idx, value)
                        } else {
                            best
                        }
                    })
                    .0
            })
            .collect())
    }
}
