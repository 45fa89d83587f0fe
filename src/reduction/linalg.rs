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

//! The small dense routines behind the randomized PCA.

use ndarray::{Array1, Array2, Axis};

/// Columns with a norm below this value are treated as linearly dependent.
const DEPENDENT_COLUMN_NORM: f64 = 1e-10;

/// Orthonormalizes the columns of `matrix` with modified Gram-Schmidt.
///
/// Linearly dependent columns become zero columns, the shape is kept.
pub fn orthonormalize_columns(mut matrix: Array2<f64>) -> Array2<f64> {
    let columns = matrix.ncols();
    for i in 0..columns {
        {
            let (done, mut rest) = matrix.view_mut().split_at(Axis(1), i);
            let mut current = rest.column_mut(0);
            for previous in done.columns() {
                let projection = previous.dot(&current);
                current.scaled_add(-projection, &previous);
            }
        }
        let mut column = matrix.column_mut(i);
        let norm = column.dot(&column).sqrt();
        if norm > DEPENDENT_COLUMN_NORM {
            column /= norm;
        } else {
            column.fill(0.0);
        }
    }
    matrix
}

/// Eigen decomposition of a symmetric matrix with the cyclic Jacobi method.
///
/// Returns the eigenvalues in descending order and the matching unit
/// eigenvectors as columns.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    const MAX_SWEEPS: usize = 100;
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);

    let scale = a.iter().map(|value| value * value).sum::<f64>().max(f64::MIN_POSITIVE);
    for _ in 0..MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += a[[p, q]] * a[[p, q]];
            }
        }
        if off_diagonal <= scale * 1e-30 {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[j, j]].total_cmp(&a[[i, i]]));
    let eigenvalues = order.iter().map(|&i| a[[i, i]]).collect::<Array1<f64>>();
    let eigenvectors = v.select(Axis(1), &order);
    (eigenvalues, eigenvectors)
}

#[cfg(test)]
mod test {
    use super::{orthonormalize_columns, symmetric_eigen};
    use float_cmp::approx_eq;
    use ndarray::{array, Array2};

    #[test]
    fn eigen_of_small_symmetric_matrix() {
        let matrix = array![[4.0, 2.0], [2.0, 3.0]];
        let (values, vectors) = symmetric_eigen(&matrix);
        let expected_large = (7.0 + 17f64.sqrt()) / 2.0;
        let expected_small = (7.0 - 17f64.sqrt()) / 2.0;
        assert!(approx_eq!(f64, expected_large, values[0], epsilon = 1e-9));
        assert!(approx_eq!(f64, expected_small, values[1], epsilon = 1e-9));
        for i in 0..2 {
            let vector = vectors.column(i);
            let mapped = matrix.dot(&vector);
            for k in 0..2 {
                assert!(approx_eq!(f64, mapped[k], values[i] * vector[k], epsilon = 1e-9));
            }
        }
    }

    #[test]
    fn eigen_of_diagonal_matrix_is_sorted() {
        let matrix = array![[1.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 3.0]];
        let (values, vectors) = symmetric_eigen(&matrix);
        assert_eq!(array![5.0, 3.0, 1.0], values);
        assert_eq!(1.0, vectors[[1, 0]].abs());
    }

    #[test]
    fn gram_schmidt_yields_orthonormal_columns() {
        let matrix = array![[1.0, 1.0, 2.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [2.0, 3.0, 5.0]];
        let q = orthonormalize_columns(matrix);
        let gram: Array2<f64> = q.t().dot(&q);
        // the third column is the sum of the first two
        let expected = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        for (a, b) in gram.iter().zip(expected.iter()) {
            assert!(approx_eq!(f64, *a, *b, epsilon = 1e-9), "{gram:?}");
        }
    }
}
