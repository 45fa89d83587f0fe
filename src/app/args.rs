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

use crate::pipeline::EvaluationTarget;
use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
/// Sentiment classification of tweets with bag-of-words features
pub struct SentimentArgs {
    /// Export the precision recall curve of the test set as csv
    #[arg(long = "display_graphs")]
    pub display_graphs: bool,
    /// Trains a new model, even if there is one
    #[arg(long)]
    pub retrain: bool,
    /// Reserved for tuning the model, currently skipped
    #[arg(long)]
    pub cross_validate: bool,
    /// Tests the latest trained model against validation_set or test_set
    #[arg(long, value_enum)]
    pub test: Vec<EvaluationTarget>,
    /// A config file, otherwise ./tweet_sentiment.* is used if present.
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,
    /// Overrides the log level from the config.
    #[arg(long)]
    pub log_level: Option<log::LevelFilter>,
    /// Log to file
    #[arg(long)]
    pub log_to_file: bool,
}

#[cfg(test)]
mod test {
    use super::SentimentArgs;
    use crate::pipeline::EvaluationTarget;
    use clap::Parser;

    #[test]
    fn accepts_the_flags_of_the_script() {
        let args = SentimentArgs::try_parse_from([
            "tweet_sentiment",
            "--display_graphs",
            "--retrain",
            "--cross-validate",
            "--test=validation_set",
            "--test=test_set",
        ])
        .unwrap();
        assert!(args.display_graphs);
        assert!(args.retrain);
        assert!(args.cross_validate);
        assert_eq!(
            vec![EvaluationTarget::ValidationSet, EvaluationTarget::TestSet],
            args.test
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn no_flags_means_nothing_requested() {
        let args = SentimentArgs::try_parse_from(["tweet_sentiment"]).unwrap();
        assert!(!args.retrain);
        assert!(args.test.is_empty());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn rejects_unknown_targets() {
        assert!(SentimentArgs::try_parse_from(["tweet_sentiment", "--test=train_set"]).is_err());
    }

    #[test]
    fn ambient_flags() {
        let args = SentimentArgs::try_parse_from([
            "tweet_sentiment",
            "-c",
            "cfg/run.json",
            "--log-level",
            "debug",
            "--log-to-file",
        ])
        .unwrap();
        assert_eq!(Some("cfg/run.json".into()), args.config);
        assert_eq!(Some(log::LevelFilter::Debug), args.log_level);
        assert!(args.log_to_file);
    }
}
