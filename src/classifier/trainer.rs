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

use crate::classifier::{ClassificationDataset, ClassifierError, TrainableClassifier, TrainerParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A training context around a classifier.
///
/// Wrapping a freshly loaded classifier in a new trainer is required before it
/// can be evaluated or trained further.
pub struct Trainer<C: TrainableClassifier> {
    classifier: C,
    state: C::TrainingState,
    params: TrainerParams,
    rng: StdRng,
    epochs: usize,
}

impl<C: TrainableClassifier> Trainer<C> {
    pub fn new(classifier: C, params: TrainerParams, seed: u64) -> Self {
        let state = classifier.fresh_training_state();
        Self {
            classifier,
            state,
            params,
            rng: StdRng::seed_from_u64(seed),
            epochs: 0,
        }
    }

    /// Trains one epoch and returns the mean loss of that epoch.
    pub fn train_epoch(&mut self, dataset: &ClassificationDataset) -> Result<f64, ClassifierError> {
        let loss = self.classifier.train_epoch(
            &mut self.state,
            &self.params,
            &mut self.rng,
            dataset,
        )?;
        self.epochs += 1;
        log::info!("Epoch {}: total error {loss:.6}", self.epochs);
        Ok(loss)
    }

    /// Trains `epochs` epochs and returns the loss of every epoch.
    #[cfg(test)]
    pub fn train_epochs(
        &mut self,
        dataset: &ClassificationDataset,
        epochs: usize,
    ) -> Result<Vec<f64>, ClassifierError> {
        (0..epochs).map(|_| self.train_epoch(dataset)).collect()
    }

    /// Predicts the class of every sample in `dataset`.
    pub fn test_on_class_data(&self, dataset: &ClassificationDataset) -> Result<Vec<usize>, ClassifierError> {
        self.classifier.predict(dataset)
    }

    /// The probability of the positive class (index 1) for every sample.
    pub fn positive_scores(&self, dataset: &ClassificationDataset) -> Result<Vec<f64>, ClassifierError> {
        let probabilities = self.classifier.class_probabilities(dataset.inputs())?;
        if probabilities.ncols() < 2 {
            return Err(ClassifierError::DimensionMismatch {
                what: "classes",
                expected: 2,
                found: probabilities.ncols(),
            });
        }
        Ok(probabilities.column(1).to_vec())
    }

    /// The number of epochs trained in this context
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[cfg(test)]
    pub fn into_classifier(self) -> C {
        self.classifier
    }
}
