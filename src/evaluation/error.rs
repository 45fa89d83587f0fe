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

use thiserror::Error;

/// Errors of computing or exporting metrics
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Got {predictions} predictions for {truth} labels.")]
    LengthMismatch { predictions: usize, truth: usize },
    #[error("Can not evaluate without any sample.")]
    Empty,
    #[error("The precision recall curve needs at least one positive sample.")]
    NoPositiveSamples,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
