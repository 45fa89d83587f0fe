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

mod args;
mod instruction;
mod logging;

pub use args::SentimentArgs;
pub use instruction::{InstructionError, RunInstruction};

use crate::app::instruction::prepare_instruction;
use crate::app::logging::configure_logging;
use crate::pipeline::{Pipeline, PipelineError, RunReport};
use std::process::ExitCode;

pub fn exec_args(args: SentimentArgs) -> ExitCode {
    let instruction = match prepare_instruction(args) {
        Ok(instruction) => instruction,
        Err(err) => {
            eprintln!("Failed with: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = configure_logging(&instruction.configs) {
        eprintln!("Failed to configure the logging: {err}");
        return ExitCode::FAILURE;
    }
    execute(&instruction)
}

/// Execute the pipeline and log the outcome.
fn execute(instruction: &RunInstruction) -> ExitCode {
    match run(instruction) {
        Ok(report) => {
            log::info!(
                "Finished the {} run with {:.2} percent training error",
                report.branch,
                report.train_error
            );
            for evaluation in &report.evaluations {
                log::info!(
                    "{}: {:.2} percent error",
                    evaluation.target,
                    evaluation.percent_error
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

pub fn run(instruction: &RunInstruction) -> Result<RunReport, PipelineError> {
    Pipeline::new(
        instruction.configs.pipeline.clone(),
        &instruction.configs.paths,
    )?
    .run(&instruction.options)
}
