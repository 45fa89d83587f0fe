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

use crate::classifier::ClassifierError;
use crate::config::PipelineConfigError;
use crate::corpus::{DataError, SplitKind};
use crate::evaluation::EvaluationError;
use crate::reduction::ReductionError;
use crate::store::StoreError;
use thiserror::Error;

/// Every failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] PipelineConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Reduction(#[from] ReductionError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("The stored {split} features have {features} rows but the split has {labels} labels. Rerun with --retrain.")]
    DimensionMismatch {
        split: SplitKind,
        features: usize,
        labels: usize,
    },
}
