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

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// The folder with the parsed train/valid/test splits
pub const DEFAULT_DATA_DIR: &str = "parsed_data";
/// The folder holding the cached artifacts
pub const DEFAULT_ARTIFACT_DIR: &str = "data";
/// The name of the log file inside the artifact folder
pub const DEFAULT_LOG_FILE: &str = "tweet_sentiment.log";

/// Paths used by the pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename(serialize = "Paths"))]
pub struct PathsConfig {
    /// Folder containing `train.csv`, `valid.csv` and `test.csv`
    #[serde(default = "_default_data_dir")]
    pub data_dir: Utf8PathBuf,
    /// Folder of the artifact store
    #[serde(default = "_default_artifact_dir")]
    pub artifact_dir: Utf8PathBuf,
    /// Name of the log file, relative to the artifact folder
    #[serde(default = "_default_log_file")]
    pub log_file: String,
}

fn _default_data_dir() -> Utf8PathBuf {
    DEFAULT_DATA_DIR.into()
}
fn _default_artifact_dir() -> Utf8PathBuf {
    DEFAULT_ARTIFACT_DIR.into()
}
fn _default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

impl PathsConfig {
    pub fn data_path(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn artifact_path(&self) -> &Utf8Path {
        &self.artifact_dir
    }

    pub fn log_path(&self) -> Utf8PathBuf {
        self.artifact_dir.join(&self.log_file)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: _default_data_dir(),
            artifact_dir: _default_artifact_dir(),
            log_file: _default_log_file(),
        }
    }
}
