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

/// Errors of assembling datasets for, training or querying a classifier
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("The classifier expects {expected} {what} but got {found}.")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("The label {label} is not one of the {classes} classes.")]
    LabelOutOfRange { label: usize, classes: usize },
    #[error("Got {inputs} input rows but {labels} labels.")]
    LengthMismatch { inputs: usize, labels: usize },
    #[error("Can not train on an empty dataset.")]
    EmptyDataset,
}
