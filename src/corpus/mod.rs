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

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter};

mod error;
pub mod loader;

pub use error::DataError;
pub use loader::CorpusLoader;

/// The binary sentiment of a tweet.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum Sentiment {
    Negative = 0,
    Positive = 1,
}

impl Sentiment {
    /// The class index used by the classifier
    #[inline]
    pub fn class_index(self) -> usize {
        u8::from(self) as usize
    }
}

/// The three disjoint splits of the corpus.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SplitKind {
    Train,
    Valid,
    Test,
}

impl SplitKind {
    /// The file name of the split inside the data folder
    pub fn file_name(self) -> String {
        format!("{self}.csv")
    }
}

/// A tweet with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    label: Sentiment,
}

impl Document {
    pub fn new(text: impl Into<String>, label: Sentiment) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An ordered sequence of documents belonging to one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSplit {
    kind: SplitKind,
    documents: Vec<Document>,
}

impl LabeledSplit {
    pub fn new(kind: SplitKind, documents: Vec<Document>) -> Self {
        Self { kind, documents }
    }

    pub fn kind(&self) -> SplitKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.documents.iter().map(Document::text)
    }

    /// The class indices in document order
    pub fn class_indices(&self) -> Vec<usize> {
        self.documents
            .iter()
            .map(|doc| doc.label.class_index())
            .collect()
    }

    /// Keeps the leading `fraction` of the documents.
    ///
    /// The kept length is `floor(len * fraction)`. A slice without a single
    /// document is an error instead of an empty split.
    pub fn take_fraction(mut self, fraction: f64) -> Result<Self, DataError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(DataError::InvalidFraction(fraction));
        }
        let len = self.documents.len();
        let keep = ((len as f64) * fraction).floor() as usize;
        if keep == 0 {
            return Err(DataError::EmptySplit {
                split: self.kind,
                len,
                fraction,
            });
        }
        self.documents.truncate(keep);
        Ok(self)
    }
}

/// The train, validation and test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    pub train: LabeledSplit,
    pub valid: LabeledSplit,
    pub test: LabeledSplit,
}

impl Corpus {
    pub fn new(train: LabeledSplit, valid: LabeledSplit, test: LabeledSplit) -> Self {
        Self { train, valid, test }
    }

    pub fn split(&self, kind: SplitKind) -> &LabeledSplit {
        match kind {
            SplitKind::Train => &self.train,
            SplitKind::Valid => &self.valid,
            SplitKind::Test => &self.test,
        }
    }

    /// Slices every split to its leading `fraction`.
    pub fn take_fraction(self, fraction: f64) -> Result<Self, DataError> {
        Ok(Self {
            train: self.train.take_fraction(fraction)?,
            valid: self.valid.take_fraction(fraction)?,
            test: self.test.take_fraction(fraction)?,
        })
    }

    /// All texts of train, valid and test, in that order.
    pub fn all_texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.train
            .texts()
            .chain(self.valid.texts())
            .chain(self.test.texts())
    }
}
