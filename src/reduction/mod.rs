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

use ndarray::{Array1, Array2, Axis};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

mod error;
pub mod linalg;

pub use error::ReductionError;

/// Configuration of the randomized range finder.
///
/// The fit is randomized, the same seed on the same input always yields the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizedPcaSettings {
    /// Additional random directions beyond the requested components
    pub oversamples: usize,
    /// Subspace iterations, more iterations sharpen the spectrum
    pub power_iterations: usize,
    pub seed: u64,
}

#[cfg(test)]
impl Default for RandomizedPcaSettings {
    fn default() -> Self {
        Self {
            oversamples: 10,
            power_iterations: 3,
            seed: 42,
        }
    }
}

/// A fitted linear projection: mean offset plus principal axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducerState {
    mean: Array1<f64>,
    /// One principal axis per row, `components x input_width`
    components: Array2<f64>,
    explained_variance: Array1<f64>,
}

impl ReducerState {
    /// Fits `components` principal axes on the rows of `matrix`.
    ///
    /// Only the training matrix may ever be passed here.
    pub fn fit(
        matrix: &Array2<f64>,
        components: usize,
        settings: &RandomizedPcaSettings,
    ) -> Result<Self, ReductionError> {
        let (samples, features) = matrix.dim();
        if samples == 0 || features == 0 {
            return Err(ReductionError::EmptyInput);
        }
        if components == 0 || components > samples.min(features) {
            return Err(ReductionError::TooManyComponents {
                components,
                samples,
                features,
            });
        }

        let mean = matrix.mean_axis(Axis(0)).ok_or(ReductionError::EmptyInput)?;
        let centered = matrix - &mean;

        let sketch_width = (components + settings.oversamples)
            .min(features)
            .min(samples);
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let distribution = Uniform::new(-1.0, 1.0);
        let test_matrix = Array2::from_shape_fn((features, sketch_width), |_| {
            rng.sample(&distribution)
        });

        let mut range = linalg::orthonormalize_columns(centered.dot(&test_matrix));
        for _ in 0..settings.power_iterations {
            let co_range = linalg::orthonormalize_columns(centered.t().dot(&range));
            range = linalg::orthonormalize_columns(centered.dot(&co_range));
        }

        // centered ~ range * projected, the svd of projected is cheap
        let projected = range.t().dot(&centered);
        drop(centered);
        let gram = projected.dot(&projected.t());
        let (eigenvalues, eigenvectors) = linalg::symmetric_eigen(&gram);

        let largest = eigenvalues[0].max(0.0).sqrt();
        let mut axes = Array2::zeros((components, features));
        let mut explained_variance = Array1::zeros(components);
        let degrees_of_freedom = samples.saturating_sub(1).max(1) as f64;
        for i in 0..components {
            let eigenvalue = eigenvalues[i].max(0.0);
            let singular_value = eigenvalue.sqrt();
            explained_variance[i] = eigenvalue / degrees_of_freedom;
            if singular_value <= largest * 1e-12 || singular_value == 0.0 {
                continue;
            }
            let mut axis = eigenvectors.column(i).dot(&projected) / singular_value;
            flip_sign(&mut axis);
            axes.row_mut(i).assign(&axis);
        }

        log::debug!(
            "Fitted {components} components on {samples}x{features}, explained variance {:?}",
            explained_variance
        );

        Ok(Self {
            mean,
            components: axes,
            explained_variance,
        })
    }

    /// Projects every row of `matrix` onto the fitted axes.
    pub fn transform(&self, matrix: &Array2<f64>) -> Result<Array2<f64>, ReductionError> {
        if matrix.ncols() != self.input_width() {
            return Err(ReductionError::DimensionMismatch {
                expected: self.input_width(),
                found: matrix.ncols(),
            });
        }
        Ok((matrix - &self.mean).dot(&self.components.t()))
    }

    /// The number of columns a matrix needs for [Self::transform]
    pub fn input_width(&self) -> usize {
        self.mean.len()
    }

    /// The number of columns produced by [Self::transform]
    pub fn output_width(&self) -> usize {
        self.components.nrows()
    }

    #[cfg(test)]
    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    pub fn explained_variance(&self) -> &Array1<f64> {
        &self.explained_variance
    }
}

/// Makes the largest coefficient of an axis positive, so the sign does not depend on the sketch.
fn flip_sign(axis: &mut Array1<f64>) {
    let pivot = axis
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if pivot < 0.0 {
        axis.mapv_inplace(|value| -value);
    }
}

#[cfg(test)]
mod test {
    use super::{RandomizedPcaSettings, ReducerState, ReductionError};
    use float_cmp::approx_eq;
    use ndarray::{array, Array2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_binary_matrix(seed: u64, rows: usize, columns: usize) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array2::from_shape_fn((rows, columns), |_| if rng.gen_bool(0.3) { 1.0 } else { 0.0 })
    }

    #[test]
    fn finds_the_dominant_direction() {
        let matrix = array![[1.0, 1.1], [2.0, 1.9], [3.0, 3.0], [4.0, 4.1], [5.0, 4.9]];
        let state = ReducerState::fit(&matrix, 1, &RandomizedPcaSettings::default()).unwrap();
        let axis = state.components().row(0);
        let expected = 1.0 / 2f64.sqrt();
        assert!(approx_eq!(f64, expected, axis[0], epsilon = 1e-2), "{axis:?}");
        assert!(approx_eq!(f64, expected, axis[1], epsilon = 1e-2), "{axis:?}");
        assert!(state.explained_variance()[0] > 4.0);
        assert_eq!(2, state.input_width());
        assert_eq!(1, state.output_width());
    }

    #[test]
    fn axes_are_orthonormal() {
        let matrix = random_binary_matrix(7, 60, 25);
        let state = ReducerState::fit(&matrix, 5, &RandomizedPcaSettings::default()).unwrap();
        let gram = state.components().dot(&state.components().t());
        for i in 0..5 {
            for j in 0..5 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(approx_eq!(f64, expected, gram[[i, j]], epsilon = 1e-8), "{gram:?}");
            }
        }
        let variance = state.explained_variance();
        for i in 1..5 {
            assert!(variance[i - 1] >= variance[i]);
        }
    }

    #[test]
    fn same_seed_same_state_and_stable_transform() {
        let matrix = random_binary_matrix(11, 40, 30);
        let settings = RandomizedPcaSettings {
            seed: 3,
            ..RandomizedPcaSettings::default()
        };
        let a = ReducerState::fit(&matrix, 4, &settings).unwrap();
        let b = ReducerState::fit(&matrix, 4, &settings).unwrap();
        assert_eq!(a, b);

        let first = a.transform(&matrix).unwrap();
        let second = a.transform(&matrix).unwrap();
        assert_eq!(first, second);
        assert_eq!((40, 4), first.dim());
    }

    #[test]
    fn transform_centers_on_the_training_mean() {
        let matrix = random_binary_matrix(5, 20, 8);
        let state = ReducerState::fit(&matrix, 3, &RandomizedPcaSettings::default()).unwrap();
        let reduced = state.transform(&matrix).unwrap();
        for column in reduced.columns() {
            assert!(approx_eq!(f64, 0.0, column.sum(), epsilon = 1e-9));
        }
    }

    #[test]
    fn rejects_wrong_width_and_bad_component_counts() {
        let matrix = random_binary_matrix(1, 10, 6);
        let state = ReducerState::fit(&matrix, 2, &RandomizedPcaSettings::default()).unwrap();
        assert_eq!(
            Err(ReductionError::DimensionMismatch {
                expected: 6,
                found: 5
            }),
            state.transform(&Array2::zeros((3, 5)))
        );
        assert_eq!(
            Err(ReductionError::TooManyComponents {
                components: 7,
                samples: 10,
                features: 6
            }),
            ReducerState::fit(&matrix, 7, &RandomizedPcaSettings::default())
        );
        assert_eq!(
            Err(ReductionError::EmptyInput),
            ReducerState::fit(&Array2::zeros((0, 6)), 1, &RandomizedPcaSettings::default())
        );
    }
}
