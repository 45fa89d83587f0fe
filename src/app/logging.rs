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

use crate::config::Configs;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use thiserror::Error;

const PATTERN: &str = "{l}@Thread{I} - {d} - {m}{n}";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}

/// The crate logs at the configured level, everything else only warnings.
fn logging_config(configs: &Configs) -> Result<Config, LoggingError> {
    let config = Config::builder();

    let config = if configs.system.log_to_file {
        let path = configs.paths.log_path();
        println!("Logging to {path}");
        let file_logger = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build(path)?;
        config.appender(Appender::builder().build("out", Box::new(file_logger)))
    } else {
        let console_logger = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build();
        config.appender(Appender::builder().build("out", Box::new(console_logger)))
    };

    Ok(config
        .logger(Logger::builder().build(env!("CARGO_CRATE_NAME"), configs.system.log_level))
        .build(Root::builder().appender("out").build(LevelFilter::Warn))?)
}

/// Configure the logging
pub fn configure_logging(configs: &Configs) -> Result<(), LoggingError> {
    log4rs::init_config(logging_config(configs)?)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::logging_config;
    use crate::config::Configs;

    #[test]
    fn file_logging_writes_below_the_artifacts() {
        let dir = camino_tempfile::tempdir().unwrap();
        let mut configs = Configs::default();
        configs.paths.artifact_dir = dir.path().to_path_buf();
        configs.system.log_to_file = true;
        let config = logging_config(&configs).unwrap();
        assert_eq!(1, config.appenders().len());
        assert_eq!("tweet_sentiment", config.loggers()[0].name());
        assert!(configs.paths.log_path().exists());
    }

    #[test]
    fn console_logging_is_the_default() {
        let config = logging_config(&Configs::default()).unwrap();
        assert_eq!("out", config.appenders()[0].name());
        assert_eq!(log::LevelFilter::Info, config.loggers()[0].level());
    }
}
