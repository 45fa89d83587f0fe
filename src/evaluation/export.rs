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

use crate::corpus::SplitKind;
use crate::evaluation::{EvaluationError, PrecisionRecall};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CurvePoint {
    threshold: Option<f64>,
    precision: f64,
    recall: f64,
}

/// Writes precision recall curves as csv files instead of drawing them.
#[derive(Debug, Clone)]
pub struct CurveSink {
    root: Utf8PathBuf,
}

impl CurveSink {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, split: SplitKind) -> Utf8PathBuf {
        self.root.join(format!("precision_recall_{split}.csv"))
    }

    /// Writes one `threshold,precision,recall` row per point and returns the written file.
    pub fn export(
        &self,
        split: SplitKind,
        curve: &PrecisionRecall,
    ) -> Result<Utf8PathBuf, EvaluationError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path(split);
        write_curve(&path, curve)?;
        log::info!(
            "Exported the precision recall curve of {split} with {} points to {path}.",
            curve.points()
        );
        Ok(path)
    }
}

fn write_curve(path: &Utf8Path, curve: &PrecisionRecall) -> Result<(), EvaluationError> {
    let mut writer = csv::Writer::from_path(path)?;
    for (idx, (&precision, &recall)) in curve.precision.iter().zip(&curve.recall).enumerate() {
        writer.serialize(CurvePoint {
            threshold: curve.thresholds.get(idx).copied(),
            precision,
            recall,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::CurveSink;
    use crate::corpus::SplitKind;
    use crate::evaluation::precision_recall;

    #[test]
    fn exports_every_point() {
        let dir = camino_tempfile::tempdir().unwrap();
        let sink = CurveSink::new(dir.path().join("graphs"));
        let curve = precision_recall(&[0.1, 0.4, 0.35, 0.8], &[0, 0, 1, 1]).unwrap();
        let path = sink.export(SplitKind::Test, &curve).unwrap();
        assert_eq!(dir.path().join("graphs").join("precision_recall_test.csv"), path);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!("threshold,precision,recall", lines[0]);
        assert_eq!(6, lines.len());
        assert_eq!("0.1,0.5,1.0", lines[1]);
        assert_eq!(",1.0,0.0", lines[5]);
    }
}
