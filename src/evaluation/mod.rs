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

//! Metrics of a trained classifier.

use itertools::Itertools;
use serde::Serialize;

mod error;
pub mod export;

pub use error::EvaluationError;
pub use export::CurveSink;

fn check_lengths(predictions: usize, truth: usize) -> Result<(), EvaluationError> {
    if predictions != truth {
        return Err(EvaluationError::LengthMismatch { predictions, truth });
    }
    if truth == 0 {
        return Err(EvaluationError::Empty);
    }
    Ok(())
}

/// The share of wrong predictions in percent.
pub fn percent_error(predictions: &[usize], truth: &[usize]) -> Result<f64, EvaluationError> {
    check_lengths(predictions.len(), truth.len())?;
    let wrong = predictions
        .iter()
        .zip_eq(truth)
        .filter(|(predicted, expected)| predicted != expected)
        .count();
    Ok(wrong as f64 / truth.len() as f64 * 100.0)
}

/// A precision recall curve of the positive class (index 1).
///
/// The points are ordered by increasing threshold, `precision[i]` and `recall[i]`
/// belong to `thresholds[i]`. The last point `(1, 0)` has no threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionRecall {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub thresholds: Vec<f64>,
    pub average_precision: f64,
}

impl PrecisionRecall {
    /// The number of points, one more than thresholds
    pub fn points(&self) -> usize {
        self.precision.len()
    }
}

/// Sweeps over every distinct score as a decision threshold.
pub fn precision_recall(scores: &[f64], truth: &[usize]) -> Result<PrecisionRecall, EvaluationError> {
    check_lengths(scores.len(), truth.len())?;

    let order = (0..scores.len())
        .sorted_by(|&a, &b| scores[b].total_cmp(&scores[a]))
        .collect_vec();

    // (threshold, true positives, false positives), highest threshold first
    let mut sweep: Vec<(f64, usize, usize)> = Vec::new();
    let mut true_positives = 0usize;
    for (seen, (&idx, next)) in order
        .iter()
        .zip(order.iter().skip(1).map(Some).chain([None]))
        .enumerate()
    {
        if truth[idx] == 1 {
            true_positives += 1;
        }
        let last_of_score = match next {
            Some(&next) => scores[next] != scores[idx],
            None => true,
        };
        if last_of_score {
            sweep.push((scores[idx], true_positives, seen + 1 - true_positives));
        }
    }

    if true_positives == 0 {
        return Err(EvaluationError::NoPositiveSamples);
    }
    let positives = true_positives as f64;

    let mut precision = Vec::with_capacity(sweep.len() + 1);
    let mut recall = Vec::with_capacity(sweep.len() + 1);
    let mut thresholds = Vec::with_capacity(sweep.len());
    for &(threshold, tp, fp) in sweep.iter().rev() {
        precision.push(tp as f64 / (tp + fp) as f64);
        recall.push(tp as f64 / positives);
        thresholds.push(threshold);
    }
    precision.push(1.0);
    recall.push(0.0);

    let average_precision = recall
        .iter()
        .tuple_windows()
        .zip(&precision)
        .map(|((current, next), precision)| (current - next) * precision)
        .sum();

    Ok(PrecisionRecall {
        precision,
        recall,
        thresholds,
        average_precision,
    })
}
