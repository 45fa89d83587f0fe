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

use crate::classifier::{
    ClassificationDataset, ClassifierError, ClassifierShape, TrainableClassifier, TrainerParams,
};
use ndarray::{Array, Array1, Array2, ArrayView1, ArrayViewMut1, Axis, Dimension};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A network with one sigmoid hidden layer and a softmax output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardNetwork {
    shape: ClassifierShape,
    hidden_weights: Array2<f64>,
    hidden_bias: Array1<f64>,
    output_weights: Array2<f64>,
    output_bias: Array1<f64>,
}

/// The velocities of every parameter for momentum descent.
#[derive(Debug, Clone)]
pub struct MomentumBuffers {
    hidden_weights: Array2<f64>,
    hidden_bias: Array1<f64>,
    output_weights: Array2<f64>,
    output_bias: Array1<f64>,
}

#[inline]
fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

fn softmax_in_place(mut logits: ArrayViewMut1<f64>) {
    let max = logits.fold(f64::NEG_INFINITY, |acc, &value| acc.max(value));
    logits.mapv_inplace(|value| (value - max).exp());
    let sum = logits.sum();
    logits /= sum;
}

fn outer(column: ArrayView1<f64>, row: ArrayView1<f64>) -> Array2<f64> {
    column
        .insert_axis(Axis(1))
        .dot(&row.insert_axis(Axis(0)))
}

/// `v = momentum * v - lr * (g + decay * p)` followed by `p += v`
fn descend<D: Dimension>(
    parameter: &mut Array<f64, D>,
    velocity: &mut Array<f64, D>,
    mut gradient: Array<f64, D>,
    params: &TrainerParams,
    decay: bool,
) {
    if decay && params.weight_decay != 0.0 {
        gradient.scaled_add(params.weight_decay, parameter);
    }
    velocity.mapv_inplace(|value| value * params.momentum);
    velocity.scaled_add(-params.learning_rate, &gradient);
    *parameter += &*velocity;
}

impl FeedForwardNetwork {
    fn check_input_width(&self, found: usize) -> Result<(), ClassifierError> {
        if found != self.shape.input {
            return Err(ClassifierError::DimensionMismatch {
                what: "input columns",
                expected: self.shape.input,
                found,
            });
        }
        Ok(())
    }
}

impl TrainableClassifier for FeedForwardNetwork {
    type TrainingState = MomentumBuffers;

    fn construct(shape: ClassifierShape, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut init = |rows: usize, columns: usize| {
            let bound = 1.0 / (rows.max(1) as f64).sqrt();
            let distribution = Uniform::new_inclusive(-bound, bound);
            Array2::from_shape_fn((rows, columns), |_| rng.sample(&distribution))
        };
        let hidden_weights = init(shape.input, shape.hidden);
        let output_weights = init(shape.hidden, shape.output);
        Self {
            shape,
            hidden_weights,
            hidden_bias: Array1::zeros(shape.hidden),
            output_weights,
            output_bias: Array1::zeros(shape.output),
        }
    }

    fn shape(&self) -> ClassifierShape {
        self.shape
    }

    fn fresh_training_state(&self) -> MomentumBuffers {
        MomentumBuffers {
            hidden_weights: Array2::zeros(self.hidden_weights.raw_dim()),
            hidden_bias: Array1::zeros(self.hidden_bias.raw_dim()),
            output_weights: Array2::zeros(self.output_weights.raw_dim()),
            output_bias: Array1::zeros(self.output_bias.raw_dim()),
        }
    }

    /// Online backpropagation over the shuffled samples, minimizing the cross entropy.
    fn train_epoch(
        &mut self,
        state: &mut MomentumBuffers,
        params: &TrainerParams,
        rng: &mut StdRng,
        dataset: &ClassificationDataset,
    ) -> Result<f64, ClassifierError> {
        if dataset.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }
        self.check_input_width(dataset.input_width())?;
        if dataset.nb_classes() != self.shape.output {
            return Err(ClassifierError::DimensionMismatch {
                what: "classes",
                expected: self.shape.output,
                found: dataset.nb_classes(),
            });
        }

        let mut order: Vec<usize> = (0..dataset.len()).collect();
        order.shuffle(rng);

        let mut loss = 0.0;
        for sample in order {
            let input = dataset.inputs().row(sample);
            let target = dataset.targets().row(sample);

            let hidden = (input.dot(&self.hidden_weights) + &self.hidden_bias).mapv(sigmoid);
            let mut output = hidden.dot(&self.output_weights) + &self.output_bias;
            softmax_in_place(output.view_mut());

            loss -= target
                .iter()
                .zip(output.iter())
                .map(|(t, p)| t * p.max(f64::MIN_POSITIVE).ln())
                .sum::<f64>();

            let output_delta = &output - &target;
            let hidden_delta =
                self.output_weights.dot(&output_delta) * hidden.mapv(|h| h * (1.0 - h));

            let output_gradient = outer(hidden.view(), output_delta.view());
            let hidden_gradient = outer(input, hidden_delta.view());

            descend(
                &mut self.output_weights,
                &mut state.output_weights,
                output_gradient,
                params,
                true,
            );
            descend(
                &mut self.output_bias,
                &mut state.output_bias,
                output_delta,
                params,
                false,
            );
            descend(
                &mut self.hidden_weights,
                &mut state.hidden_weights,
                hidden_gradient,
                params,
                true,
            );
            descend(
                &mut self.hidden_bias,
                &mut state.hidden_bias,
                hidden_delta,
                params,
                false,
            );
        }
        Ok(loss / dataset.len() as f64)
    }

    fn class_probabilities(&self, inputs: &Array2<f64>) -> Result<Array2<f64>, ClassifierError> {
        self.check_input_width(inputs.ncols())?;
        let hidden = (inputs.dot(&self.hidden_weights) + &self.hidden_bias).mapv(sigmoid);
        let mut output = hidden.dot(&self.output_weights) + &self.output_bias;
        for row in output.rows_mut() {
            softmax_in_place(row);
        }
        Ok(output)
    }
}
