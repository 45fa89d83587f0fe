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

use crate::corpus::Corpus;
use crate::features::{tokenize, FeatureMatrix, FeatureSet, Vocabulary};
use ndarray::Array2;
use std::collections::HashSet;

/// Turns documents into binary presence vectors over a fixed [Vocabulary].
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'a> {
    vocabulary: &'a Vocabulary,
    progress_interval: usize,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            vocabulary,
            progress_interval: 0,
        }
    }

    /// Logs the progress every `interval` documents, 0 disables it.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Builds the feature row of a single document.
    pub fn extract_document(&self, document: &str) -> Vec<f64> {
        let tokens: HashSet<&str> = tokenize(document).collect();
        self.vocabulary
            .words()
            .iter()
            .map(|word| if tokens.contains(word.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }

    /// Builds the feature matrix of `documents`, row order equals input order.
    pub fn extract<'d, I>(&self, documents: I) -> FeatureMatrix
    where
        I: IntoIterator<Item = &'d str>,
    {
        let documents: Vec<&str> = documents.into_iter().collect();
        let mut matrix = Array2::zeros((documents.len(), self.vocabulary.len()));
        for (row, document) in documents.into_iter().enumerate() {
            if self.progress_interval != 0 && row % self.progress_interval == 0 {
                log::info!("Extracted features for {row} tweets");
            }
            for (column, value) in self.extract_document(document).into_iter().enumerate() {
                matrix[[row, column]] = value;
            }
        }
        FeatureMatrix::new(matrix)
    }
}

/// Extracts train, validation and test against the same vocabulary,
/// so the columns of all three matrices mean the same words.
pub fn extract_splits(
    vocabulary: &Vocabulary,
    corpus: &Corpus,
    progress_interval: usize,
) -> FeatureSet {
    log::info!("Extracting features for all tweets");
    let extractor = FeatureExtractor::new(vocabulary).with_progress_interval(progress_interval);
    let set = FeatureSet {
        train: extractor.extract(corpus.train.texts()),
        valid: extractor.extract(corpus.valid.texts()),
        test: extractor.extract(corpus.test.texts()),
    };
    log::info!("Extracted features for all tweets");
    set
}

#[cfg(test)]
mod test {
    use crate::corpus::test::split_of;
    use crate::corpus::{Corpus, SplitKind};
    use crate::features::{extract_splits, FeatureExtractor, Vocabulary};
    use ndarray::array;

    #[test]
    fn extracts_presence_rows() {
        let docs = ["lol jbiebs", "lol", "jbiebs wow", "wow"];
        let vocabulary = Vocabulary::build(docs, 3);
        let matrix = FeatureExtractor::new(&vocabulary).extract(docs);
        assert_eq!(
            array![
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0]
            ],
            *matrix
        );
    }

    #[test]
    fn repeated_and_unknown_tokens() {
        let vocabulary = Vocabulary::build(["a b", "a c"], 3);
        let extractor = FeatureExtractor::new(&vocabulary);
        let row = extractor.extract_document("a a a zzz");
        assert_eq!(vocabulary.len(), row.len());
        assert_eq!(vec![1.0, 0.0, 0.0], row);
        // exact match, no normalisation
        assert_eq!(vec![0.0, 0.0, 0.0], extractor.extract_document("A B, c."));
        assert_eq!(vec![0.0, 0.0, 0.0], extractor.extract_document(""));
    }

    #[test]
    fn one_entry_per_present_word() {
        let docs = [
            "the cat sat on the mat",
            "the dog ate the cat",
            "a bird",
        ];
        let vocabulary = Vocabulary::build(docs, 5);
        let extractor = FeatureExtractor::new(&vocabulary).with_progress_interval(1);
        let matrix = extractor.extract(docs);
        for (idx, doc) in docs.iter().enumerate() {
            let present = vocabulary
                .words()
                .iter()
                .filter(|word| doc.split_whitespace().any(|token| token == word.as_str()))
                .count();
            let row = matrix.row(idx);
            assert_eq!(vocabulary.len(), row.len());
            assert_eq!(present as f64, row.sum());
        }
    }

    #[test]
    fn splits_share_columns() {
        let corpus = Corpus::new(
            split_of(SplitKind::Train, &[("good day", 1), ("bad day", 0)]),
            split_of(SplitKind::Valid, &[("day good", 1)]),
            split_of(SplitKind::Test, &[("bad", 0), ("unknown", 1)]),
        );
        let vocabulary = Vocabulary::build(corpus.all_texts(), 10);
        let set = extract_splits(&vocabulary, &corpus, 0);
        assert_eq!(vec!["day", "good", "bad", "unknown"], vocabulary.words());
        assert_eq!(array![[1.0, 1.0, 0.0, 0.0]], *set.valid);
        assert_eq!(array![[0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]], *set.test);
        assert_eq!(2, set.train.documents());
        assert_eq!(4, set.train.width());
    }
}
