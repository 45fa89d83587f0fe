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

use crate::corpus::SplitKind;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors while reading or slicing the upstream splits
#[derive(Debug, Error)]
pub enum DataError {
    #[error("The {split} split is missing, expected it at {path}.")]
    DataMissing { split: SplitKind, path: Utf8PathBuf },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Row {row} of {path} is malformed: {source}")]
    Malformed {
        path: Utf8PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Row {row} of {path} has the label {label}, only 0 and 1 are allowed.")]
    InvalidLabel {
        path: Utf8PathBuf,
        row: usize,
        label: u8,
    },
    #[error("Using {fraction} of the {len} documents of the {split} split leaves no document.")]
    EmptySplit {
        split: SplitKind,
        len: usize,
        fraction: f64,
    },
    #[error("The dataset fraction has to be in (0, 1] but was {0}.")]
    InvalidFraction(f64),
}
