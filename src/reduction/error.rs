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

/// Errors of fitting or applying a [super::ReducerState]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReductionError {
    #[error("Can not fit a projection on a matrix without rows or columns.")]
    EmptyInput,
    #[error("Can not fit {components} components on {samples} samples with {features} features.")]
    TooManyComponents {
        components: usize,
        samples: usize,
        features: usize,
    },
    #[error("The projection expects {expected} columns but the matrix has {found}.")]
    DimensionMismatch { expected: usize, found: usize },
}
