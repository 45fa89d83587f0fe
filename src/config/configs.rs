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

use crate::config::{PathsConfig, PipelineConfig, SystemConfig};
use camino::Utf8Path;
use config::Config;
use serde::{Deserialize, Serialize};

/// The prefix of environment variables overriding config values,
/// e.g. `TWEET_SENTIMENT.PIPELINE.EPOCHS=20`
pub const ENV_PREFIX: &str = "TWEET_SENTIMENT";

/// A collection of all configs used in a run.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename(serialize = "Config"))]
pub struct Configs {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Configs {
    /// Loads the configs from an explicit file, overlaid by the environment.
    pub fn load_from<P: AsRef<Utf8Path>>(file: P) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(config::File::with_name(file.as_ref().as_str()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("."))
            .build()?
            .try_deserialize()
    }

    /// Looks for `./tweet_sentiment.*` and `./config/tweet_sentiment.*`.
    /// Every value that is not found falls back to its default.
    pub fn discover_or_default() -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("./tweet_sentiment").required(false))
            .add_source(config::File::with_name("./config/tweet_sentiment").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("."))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod test {
    use crate::config::Configs;
    use camino_tempfile::tempdir;
    use std::fs::File;
    use std::io::{BufWriter, Write};

    #[test]
    fn can_load_partial_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let mut writer = BufWriter::new(File::create(&path).unwrap());
        write!(
            &mut writer,
            r#"{{"pipeline": {{"num_features": 300, "components": 20}}, "paths": {{"artifact_dir": "cache"}}}}"#
        )
        .unwrap();
        drop(writer);

        let loaded = Configs::load_from(&path).unwrap();

        let mut expected = Configs::default();
        expected.pipeline.num_features = 300;
        expected.pipeline.components = 20;
        expected.paths.artifact_dir = "cache".into();
        assert_eq!(expected, loaded);
    }

    #[test]
    fn full_config_survives_json() {
        let mut config = Configs::default();
        config.pipeline.epochs = 99;
        config.system.log_to_file = true;
        let dir = tempdir().unwrap();
        let path = dir.path().join("full.json");
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(config, Configs::load_from(&path).unwrap());
    }
}
