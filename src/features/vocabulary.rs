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

use crate::features::tokenize;
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

/// The K most frequent words of a corpus.
///
/// Sorted by descending frequency, words with the same frequency keep the
/// order in which they were first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Counts the whitespace tokens of `documents` and keeps the `max_words` most frequent ones.
    pub fn build<'a, I>(documents: I, max_words: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        log::info!("Building vocabulary of words in the corpus");
        let mut frequencies: IndexMap<&'a str, u64> = IndexMap::new();
        for document in documents {
            for word in tokenize(document) {
                *frequencies.entry(word).or_insert(0) += 1;
            }
        }
        let distinct = frequencies.len();
        let mut ranked: Vec<(&str, u64)> = frequencies.into_iter().collect();
        // stable, keeps first-seen order for equal counts
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
        ranked.truncate(max_words);
        log::info!(
            "Built vocabulary with {} of {distinct} distinct words",
            ranked.len()
        );
        Self {
            words: ranked.into_iter().map(|(word, _)| word.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The column of `word` in a feature matrix
    #[cfg(test)]
    pub fn position(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|value| value == word)
    }
}

impl Display for Vocabulary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vocabulary({} words)", self.words.len())
    }
}
