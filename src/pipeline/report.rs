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
use crate::evaluation::PrecisionRecall;
use camino::Utf8PathBuf;
use serde::Serialize;
use strum::Display;

/// How the classifier of a run came to be
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Branch {
    /// Features, reducer and classifier were computed and saved.
    Build,
    /// Everything was loaded from the artifact directory.
    Reuse,
}

/// A held out split the trained classifier is tested against
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Display, Serialize, clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
pub enum EvaluationTarget {
    #[value(name = "validation_set")]
    ValidationSet,
    #[value(name = "test_set")]
    TestSet,
}

impl EvaluationTarget {
    pub fn split(self) -> SplitKind {
        match self {
            EvaluationTarget::ValidationSet => SplitKind::Valid,
            EvaluationTarget::TestSet => SplitKind::Test,
        }
    }
}

/// The metrics of a single [EvaluationTarget]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub target: EvaluationTarget,
    pub percent_error: f64,
    /// Only computed for the test set
    pub precision_recall: Option<PrecisionRecall>,
    /// Set if the curve was exported
    pub curve_file: Option<Utf8PathBuf>,
}

/// The outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub branch: Branch,
    /// Percent error of the classifier on its own training split
    pub train_error: f64,
    pub evaluations: Vec<EvaluationReport>,
}

#[cfg(test)]
impl RunReport {
    pub fn evaluation(&self, target: EvaluationTarget) -> Option<&EvaluationReport> {
        self.evaluations.iter().find(|report| report.target == target)
    }
}
