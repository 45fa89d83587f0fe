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

use crate::corpus::{Corpus, DataError, Document, LabeledSplit, Sentiment, SplitKind};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use strum::IntoEnumIterator;

/// A row of a split csv
#[derive(Debug, Deserialize)]
struct CorpusEntry {
    #[serde(alias = "target")]
    label: u8,
    text: String,
}

/// Reads the parsed train, validation and test splits from a folder.
///
/// Every split is a csv file with the header `label,text`.
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    data_dir: Utf8PathBuf,
}

impl CorpusLoader {
    pub fn new(data_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn split_path(&self, kind: SplitKind) -> Utf8PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Loads all three splits. Fails before reading anything if one is missing.
    pub fn load(&self) -> Result<Corpus, DataError> {
        for kind in SplitKind::iter() {
            let path = self.split_path(kind);
            if !path.exists() {
                return Err(DataError::DataMissing { split: kind, path });
            }
        }
        log::info!("Loading parsed dataset from {}", self.data_dir);
        let corpus = Corpus::new(
            self.load_split(SplitKind::Train)?,
            self.load_split(SplitKind::Valid)?,
            self.load_split(SplitKind::Test)?,
        );
        log::info!(
            "Loaded parsed dataset: {} train, {} valid, {} test documents",
            corpus.train.len(),
            corpus.valid.len(),
            corpus.test.len()
        );
        Ok(corpus)
    }

    pub fn load_split(&self, kind: SplitKind) -> Result<LabeledSplit, DataError> {
        let path = self.split_path(kind);
        if !path.exists() {
            return Err(DataError::DataMissing { split: kind, path });
        }
        read_split(kind, &path)
    }
}

fn read_split(kind: SplitKind, path: &Utf8Path) -> Result<LabeledSplit, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let mut documents = Vec::new();
    for (idx, entry) in reader.deserialize::<CorpusEntry>().enumerate() {
        let row = idx + 1;
        let entry = entry.map_err(|source| DataError::Malformed {
            path: path.to_path_buf(),
            row,
            source,
        })?;
        let label = Sentiment::try_from(entry.label).map_err(|_| DataError::InvalidLabel {
            path: path.to_path_buf(),
            row,
            label: entry.label,
        })?;
        documents.push(Document::new(entry.text, label));
    }
    Ok(LabeledSplit::new(kind, documents))
}
