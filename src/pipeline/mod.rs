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

//! Drives a run from the raw splits to the evaluated classifier.
//!
//! A run either builds every artifact or reuses the ones of an earlier run.
//! The artifact of the trained classifier decides which branch is taken.

mod error;
mod report;

pub use error::PipelineError;
pub use report::{Branch, EvaluationReport, EvaluationTarget, RunReport};

use crate::classifier::{
    ClassificationDataset, ClassifierShape, FeedForwardNetwork, TrainableClassifier, Trainer,
    TrainerParams,
};
use crate::config::{PathsConfig, PipelineConfig};
use crate::corpus::{Corpus, CorpusLoader, LabeledSplit, SplitKind};
use crate::evaluation::{percent_error, precision_recall, CurveSink, EvaluationError};
use crate::features::{extract_splits, FeatureMatrix, FeatureSet, Vocabulary};
use crate::reduction::{RandomizedPcaSettings, ReducerState};
use crate::store::{ArtifactSlot, ArtifactStore};
use itertools::Itertools;

/// Positive and negative
const NB_CLASSES: usize = 2;

/// What was requested for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Ignore existing artifacts and build everything.
    pub retrain: bool,
    /// Export the precision recall curve of the test set.
    pub display_graphs: bool,
    pub cross_validate: bool,
    pub targets: Vec<EvaluationTarget>,
}

/// The validation and test features, kept until their evaluation.
struct HeldOut {
    valid: Option<FeatureMatrix>,
    test: Option<FeatureMatrix>,
}

impl HeldOut {
    fn take(&mut self, split: SplitKind) -> Option<FeatureMatrix> {
        match split {
            SplitKind::Valid => self.valid.take(),
            SplitKind::Test => self.test.take(),
            SplitKind::Train => None,
        }
    }
}

/// The state after either branch.
struct Trained {
    branch: Branch,
    reducer: ReducerState,
    trainer: Trainer<FeedForwardNetwork>,
    train_data: ClassificationDataset,
    held_out: HeldOut,
}

/// The pipeline with its resolved locations.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: CorpusLoader,
    store: ArtifactStore,
    curves: CurveSink,
}

impl Pipeline {
    /// Validates the config and opens the artifact directory.
    pub fn new(config: PipelineConfig, paths: &PathsConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let store = ArtifactStore::open(paths.artifact_path())?;
        Ok(Self {
            config,
            loader: CorpusLoader::new(paths.data_path()),
            curves: CurveSink::new(paths.artifact_path()),
            store,
        })
    }

    #[cfg(test)]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    fn trainer_params(&self) -> TrainerParams {
        TrainerParams {
            learning_rate: self.config.learning_rate,
            momentum: self.config.momentum,
            weight_decay: self.config.weight_decay,
        }
    }

    fn pca_settings(&self) -> RandomizedPcaSettings {
        RandomizedPcaSettings {
            oversamples: self.config.oversamples,
            power_iterations: self.config.power_iterations,
            seed: self.config.seed,
        }
    }

    /// Executes one run.
    pub fn run(&self, options: &RunOptions) -> Result<RunReport, PipelineError> {
        log::info!(
            "Using {} percent of all data in the corpus",
            self.config.dataset_fraction * 100.0
        );
        log::info!(
            "Using the {} most common words as features",
            self.config.num_features
        );
        if options.cross_validate {
            log::info!("Cross validation is not supported, skipping it.");
        }

        let corpus = self.loader.load()?.take_fraction(self.config.dataset_fraction)?;

        let trained = if options.retrain || !self.store.exists(ArtifactSlot::TrainedClassifier) {
            self.build(&corpus)?
        } else {
            match self.reuse(&corpus) {
                Ok(trained) => trained,
                Err(PipelineError::Store(err)) if err.is_rebuildable() => {
                    log::warn!("Can not reuse the stored artifacts, rebuilding them: {err}");
                    self.build(&corpus)?
                }
                Err(err) => return Err(err),
            }
        };

        let Trained {
            branch,
            reducer,
            trainer,
            train_data,
            mut held_out,
        } = trained;

        let train_error = percent_error(
            &trainer.test_on_class_data(&train_data)?,
            train_data.classes(),
        )?;
        log::info!("Percent error on the training set: {train_error:.2}");
        drop(train_data);

        let mut evaluations = Vec::new();
        for target in options.targets.iter().copied().unique() {
            let split = target.split();
            let Some(features) = held_out.take(split) else {
                continue;
            };
            evaluations.push(self.evaluate(
                target,
                corpus.split(split),
                features,
                &reducer,
                &trainer,
                options.display_graphs,
            )?);
        }

        Ok(RunReport {
            branch,
            train_error,
            evaluations,
        })
    }

    fn build(&self, corpus: &Corpus) -> Result<Trained, PipelineError> {
        log::info!("Building features, reducer and classifier");
        // an aborted build must not leave the old classifier next to new features
        self.store.remove(ArtifactSlot::TrainedClassifier)?;
        let vocabulary = Vocabulary::build(corpus.all_texts(), self.config.num_features);
        log::debug!("Using {vocabulary}");

        let FeatureSet { train, valid, test } =
            extract_splits(&vocabulary, corpus, self.config.progress_interval);
        drop(vocabulary);
        self.store.save(ArtifactSlot::TrainFeatures, &train)?;
        self.store.save(ArtifactSlot::ValidFeatures, &valid)?;
        self.store.save(ArtifactSlot::TestFeatures, &test)?;
        log::info!("Saved features");

        let reducer = ReducerState::fit(&train, self.config.components, &self.pca_settings())?;
        self.store.save(ArtifactSlot::ReducerState, &reducer)?;
        log::info!(
            "Saved the reducer, its components explain a variance of {:.4}",
            reducer.explained_variance().sum()
        );

        let reduced = reducer.transform(&train)?;
        drop(train);
        let train_data =
            ClassificationDataset::new(reduced, corpus.train.class_indices(), NB_CLASSES)?;

        let valid_data = if self.config.evaluate_each_epoch {
            Some(ClassificationDataset::new(
                reducer.transform(&valid)?,
                corpus.valid.class_indices(),
                NB_CLASSES,
            )?)
        } else {
            None
        };

        let shape = ClassifierShape::new(reducer.output_width(), self.config.hidden, NB_CLASSES);
        let network = FeedForwardNetwork::construct(shape, self.config.seed);
        let mut trainer = Trainer::new(network, self.trainer_params(), self.config.seed);
        for _ in 0..self.config.epochs {
            trainer.train_epoch(&train_data)?;
            if let Some(valid_data) = &valid_data {
                let error = percent_error(
                    &trainer.test_on_class_data(valid_data)?,
                    valid_data.classes(),
                )?;
                log::info!(
                    "Epoch {}: percent error on the validation set {error:.2}",
                    trainer.epochs()
                );
            }
        }
        drop(valid_data);

        self.store
            .save(ArtifactSlot::TrainedClassifier, trainer.classifier())?;
        log::info!("Saved the classifier after {} epochs", trainer.epochs());

        Ok(Trained {
            branch: Branch::Build,
            reducer,
            trainer,
            train_data,
            held_out: HeldOut {
                valid: Some(valid),
                test: Some(test),
            },
        })
    }

    fn reuse(&self, corpus: &Corpus) -> Result<Trained, PipelineError> {
        log::info!("Reusing the artifacts in {}", self.store.root());
        let train: FeatureMatrix = self.store.load(ArtifactSlot::TrainFeatures)?;
        let valid: FeatureMatrix = self.store.load(ArtifactSlot::ValidFeatures)?;
        let test: FeatureMatrix = self.store.load(ArtifactSlot::TestFeatures)?;
        check_rows(&corpus.train, &train)?;
        check_rows(&corpus.valid, &valid)?;
        check_rows(&corpus.test, &test)?;

        let reducer: ReducerState = self.store.load(ArtifactSlot::ReducerState)?;
        let reduced = reducer.transform(&train)?;
        drop(train);
        let train_data =
            ClassificationDataset::new(reduced, corpus.train.class_indices(), NB_CLASSES)?;

        let network: FeedForwardNetwork = self.store.load(ArtifactSlot::TrainedClassifier)?;
        log::info!("Loaded the classifier {:?}", network.shape());
        let trainer = Trainer::new(network, self.trainer_params(), self.config.seed);

        Ok(Trained {
            branch: Branch::Reuse,
            reducer,
            trainer,
            train_data,
            held_out: HeldOut {
                valid: Some(valid),
                test: Some(test),
            },
        })
    }

    fn evaluate(
        &self,
        target: EvaluationTarget,
        split: &LabeledSplit,
        features: FeatureMatrix,
        reducer: &ReducerState,
        trainer: &Trainer<FeedForwardNetwork>,
        display_graphs: bool,
    ) -> Result<EvaluationReport, PipelineError> {
        check_rows(split, &features)?;
        let reduced = reducer.transform(&features)?;
        drop(features);
        let dataset = ClassificationDataset::new(reduced, split.class_indices(), NB_CLASSES)?;

        let error = percent_error(&trainer.test_on_class_data(&dataset)?, dataset.classes())?;
        log::info!("Percent error against the {target}: {error:.2}");

        let curve = if target == EvaluationTarget::TestSet {
            match precision_recall(&trainer.positive_scores(&dataset)?, dataset.classes()) {
                Ok(curve) => {
                    log::info!(
                        "Average precision against the {target}: {:.4}",
                        curve.average_precision
                    );
                    Some(curve)
                }
                Err(EvaluationError::NoPositiveSamples) => {
                    log::warn!(
                        "The {target} has no positive tweet, skipping the precision recall curve."
                    );
                    None
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            None
        };
        let curve_file = match &curve {
            Some(curve) if display_graphs => Some(self.curves.export(split.kind(), curve)?),
            _ => None,
        };

        Ok(EvaluationReport {
            target,
            percent_error: error,
            precision_recall: curve,
            curve_file,
        })
    }
}

/// Stored features have to belong to the documents of the current slice.
fn check_rows(split: &LabeledSplit, features: &FeatureMatrix) -> Result<(), PipelineError> {
    if features.documents() != split.len() {
        return Err(PipelineError::DimensionMismatch {
            split: split.kind(),
            features: features.documents(),
            labels: split.len(),
        });
    }
    Ok(())
}
