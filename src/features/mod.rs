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

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub mod extractor;
pub mod vocabulary;

pub use extractor::{extract_splits, FeatureExtractor};
pub use vocabulary::Vocabulary;

/// Splits a document into its tokens. Plain whitespace split, no normalisation.
#[inline]
pub fn tokenize(document: &str) -> impl Iterator<Item = &str> {
    document.split_whitespace()
}

/// A binary bag-of-words matrix, one row per document and one column per vocabulary word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct FeatureMatrix(Array2<f64>);

impl FeatureMatrix {
    pub fn new(inner: Array2<f64>) -> Self {
        Self(inner)
    }

    pub fn documents(&self) -> usize {
        self.0.nrows()
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.0.ncols()
    }
}

impl Deref for FeatureMatrix {
    type Target = Array2<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The feature matrices of train, validation and test, sharing one vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub train: FeatureMatrix,
    pub valid: FeatureMatrix,
    pub test: FeatureMatrix,
}
