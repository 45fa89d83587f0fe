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

use crate::classifier::ClassifierError;
use ndarray::Array2;

/// Reduced feature rows with their classes, targets expanded to one-of-many.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationDataset {
    inputs: Array2<f64>,
    classes: Vec<usize>,
    targets: Array2<f64>,
    nb_classes: usize,
}

impl ClassificationDataset {
    /// Pairs `inputs` row by row with `classes`.
    pub fn new(
        inputs: Array2<f64>,
        classes: Vec<usize>,
        nb_classes: usize,
    ) -> Result<Self, ClassifierError> {
        if inputs.nrows() != classes.len() {
            return Err(ClassifierError::LengthMismatch {
                inputs: inputs.nrows(),
                labels: classes.len(),
            });
        }
        if let Some(&label) = classes.iter().find(|&&label| label >= nb_classes) {
            return Err(ClassifierError::LabelOutOfRange {
                label,
                classes: nb_classes,
            });
        }
        let targets = one_of_many(&classes, nb_classes);
        Ok(Self {
            inputs,
            classes,
            targets,
            nb_classes,
        })
    }

    pub fn inputs(&self) -> &Array2<f64> {
        &self.inputs
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// One row per sample with a single 1 at the class index
    pub fn targets(&self) -> &Array2<f64> {
        &self.targets
    }

    pub fn nb_classes(&self) -> usize {
        self.nb_classes
    }

    pub fn input_width(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Expands class indices into one-hot rows.
pub fn one_of_many(classes: &[usize], nb_classes: usize) -> Array2<f64> {
    let mut targets = Array2::zeros((classes.len(), nb_classes));
    for (row, &class) in classes.iter().enumerate() {
        targets[[row, class]] = 1.0;
    }
    targets
}

#[cfg(test)]
mod test {
    use super::{one_of_many, ClassificationDataset};
    use crate::classifier::ClassifierError;
    use ndarray::{array, Array2};

    #[test]
    fn binary_labels_become_one_hot_rows() {
        assert_eq!(
            array![[0.0, 1.0], [1.0, 0.0], [0.0, 1.0]],
            one_of_many(&[1, 0, 1], 2)
        );
    }

    #[test]
    fn dataset_checks_lengths_and_labels() {
        let inputs = Array2::zeros((3, 4));
        assert_eq!(
            Err(ClassifierError::LengthMismatch {
                inputs: 3,
                labels: 2
            }),
            ClassificationDataset::new(inputs.clone(), vec![0, 1], 2)
        );
        assert_eq!(
            Err(ClassifierError::LabelOutOfRange {
                label: 2,
                classes: 2
            }),
            ClassificationDataset::new(inputs.clone(), vec![0, 2, 1], 2)
        );
        let dataset = ClassificationDataset::new(inputs, vec![0, 1, 1], 2).unwrap();
        assert_eq!(3, dataset.len());
        assert_eq!(4, dataset.input_width());
        assert_eq!(2, dataset.targets().ncols());
    }
}
