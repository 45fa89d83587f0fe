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

use crate::app::SentimentArgs;
use crate::config::{Configs, PipelineConfigError};
use crate::pipeline::RunOptions;
use thiserror::Error;

/// The instruction to run the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInstruction {
    pub configs: Configs,
    pub options: RunOptions,
}

#[derive(Debug, Error)]
pub enum InstructionError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("The configuration is invalid: {0}")]
    InvalidConfig(#[from] PipelineConfigError),
}

/// Consumes the args and returns everything necessary to run the pipeline
pub(crate) fn prepare_instruction(args: SentimentArgs) -> Result<RunInstruction, InstructionError> {
    let mut configs = match &args.config {
        None => Configs::discover_or_default()?,
        Some(path) => Configs::load_from(path)?,
    };

    if let Some(log_level) = args.log_level {
        configs.system.log_level = log_level;
    }
    if args.log_to_file {
        configs.system.log_to_file = true;
    }

    configs.pipeline.validate()?;

    Ok(RunInstruction {
        configs,
        options: RunOptions {
            retrain: args.retrain,
            display_graphs: args.display_graphs,
            cross_validate: args.cross_validate,
            targets: args.test,
        },
    })
}

#[cfg(test)]
mod test {
    use super::{prepare_instruction, InstructionError};
    use crate::app::SentimentArgs;
    use crate::pipeline::EvaluationTarget;
    use std::fs::File;
    use std::io::{BufWriter, Write};

    #[test]
    fn args_override_the_config_file() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        {
            let mut writer = BufWriter::new(File::create(&path).unwrap());
            write!(
                &mut writer,
                r#"{{"system": {{"log_level": "Warn"}}, "pipeline": {{"epochs": 3}}}}"#
            )
            .unwrap();
        }

        let instruction = prepare_instruction(SentimentArgs {
            config: Some(path),
            log_level: Some(log::LevelFilter::Trace),
            test: vec![EvaluationTarget::TestSet],
            retrain: true,
            ..SentimentArgs::default()
        })
        .unwrap();
        assert_eq!(log::LevelFilter::Trace, instruction.configs.system.log_level);
        assert_eq!(3, instruction.configs.pipeline.epochs);
        assert!(instruction.options.retrain);
        assert!(!instruction.options.display_graphs);
        assert_eq!(vec![EvaluationTarget::TestSet], instruction.options.targets);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"pipeline": {"dataset_fraction": 1.5}}"#).unwrap();
        let result = prepare_instruction(SentimentArgs {
            config: Some(path),
            ..SentimentArgs::default()
        });
        assert!(matches!(result, Err(InstructionError::InvalidConfig(_))));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = camino_tempfile::tempdir().unwrap();
        let result = prepare_instruction(SentimentArgs {
            config: Some(dir.path().join("missing.json")),
            ..SentimentArgs::default()
        });
        assert!(matches!(result, Err(InstructionError::Config(_))));
    }
}
