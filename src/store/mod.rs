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
use camino_tempfile::NamedUtf8TempFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use strum::{Display, EnumIter};

mod error;

pub use error::StoreError;

/// The fixed, independent slots of the [ArtifactStore].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactSlot {
    TrainFeatures,
    ValidFeatures,
    TestFeatures,
    ReducerState,
    TrainedClassifier,
}

impl ArtifactSlot {
    pub fn file_name(self) -> String {
        format!("{self}.bin")
    }
}

/// A folder with one bincode file per [ArtifactSlot].
///
/// The existence of a file is the only validity signal, nothing is fingerprinted.
/// Slots are not grouped, keeping them coherent is up to the caller.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: Utf8PathBuf,
}

impl ArtifactStore {
    /// Opens the store at `root`, creating the folder if necessary.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn path(&self, slot: ArtifactSlot) -> Utf8PathBuf {
        self.root.join(slot.file_name())
    }

    pub fn exists(&self, slot: ArtifactSlot) -> bool {
        self.path(slot).is_file()
    }

    /// Deletes the file of `slot`, returns whether there was one.
    pub fn remove(&self, slot: ArtifactSlot) -> Result<bool, StoreError> {
        match std::fs::remove_file(self.path(slot)) {
            Ok(()) => {
                log::info!("Removed {slot}");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Loads the value of `slot`.
    pub fn load<T: DeserializeOwned>(&self, slot: ArtifactSlot) -> Result<T, StoreError> {
        let path = self.path(slot);
        log::info!("Loading {slot}");
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::ArtifactMissing { slot, path });
            }
            Err(err) => return Err(err.into()),
        };
        let value = bincode::deserialize_from(BufReader::new(file))
            .map_err(|source| StoreError::ArtifactCorrupt {
                slot,
                path: path.clone(),
                source,
            })?;
        log::info!("Loaded {slot}");
        Ok(value)
    }

    /// Overwrites `slot` with `value`.
    ///
    /// The value is written to a temporary file next to the slot first, a failed
    /// write leaves the previous artifact untouched.
    pub fn save<T: Serialize + ?Sized>(&self, slot: ArtifactSlot, value: &T) -> Result<(), StoreError> {
        log::info!("Saving {slot}");
        let temp = NamedUtf8TempFile::new_in(&self.root)?;
        let mut writer = BufWriter::new(temp);
        bincode::serialize_into(&mut writer, value)?;
        writer.flush()?;
        let temp = writer.into_inner().map_err(|err| err.into_error())?;
        temp.persist(self.path(slot))?;
        log::info!("Saved {slot}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{ArtifactSlot, ArtifactStore, StoreError};
    use crate::features::FeatureMatrix;
    use crate::reduction::{RandomizedPcaSettings, ReducerState};
    use ndarray::{array, Array2};
    use strum::IntoEnumIterator;

    #[test]
    fn slot_files_are_named_after_the_slot() {
        let names = ArtifactSlot::iter()
            .map(ArtifactSlot::file_name)
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "train_features.bin",
                "valid_features.bin",
                "test_features.bin",
                "reducer_state.bin",
                "trained_classifier.bin"
            ],
            names
        );
    }

    #[test]
    fn matrices_survive_bit_for_bit() {
        let dir = camino_tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path().join("nested")).unwrap();
        let matrix = FeatureMatrix::new(array![[1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]);
        assert!(!store.exists(ArtifactSlot::TrainFeatures));
        store.save(ArtifactSlot::TrainFeatures, &matrix).unwrap();
        assert!(store.exists(ArtifactSlot::TrainFeatures));
        assert!(!store.exists(ArtifactSlot::ValidFeatures));
        let loaded: FeatureMatrix = store.load(ArtifactSlot::TrainFeatures).unwrap();
        assert_eq!(matrix, loaded);
    }

    #[test]
    fn reducer_survives_with_same_projection() {
        let dir = camino_tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        let matrix: Array2<f64> = array![[1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let state = ReducerState::fit(&matrix, 2, &RandomizedPcaSettings::default()).unwrap();
        store.save(ArtifactSlot::ReducerState, &state).unwrap();
        let loaded: ReducerState = store.load(ArtifactSlot::ReducerState).unwrap();
        assert_eq!(state.transform(&matrix).unwrap(), loaded.transform(&matrix).unwrap());
    }

    #[test]
    fn save_overwrites() {
        let dir = camino_tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        store.save(ArtifactSlot::TestFeatures, &vec![1u32, 2]).unwrap();
        store.save(ArtifactSlot::TestFeatures, &vec![3u32]).unwrap();
        let loaded: Vec<u32> = store.load(ArtifactSlot::TestFeatures).unwrap();
        assert_eq!(vec![3], loaded);
    }

    #[test]
    fn remove_deletes_only_the_slot() {
        let dir = camino_tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        store.save(ArtifactSlot::TrainedClassifier, &vec![1u32]).unwrap();
        store.save(ArtifactSlot::ReducerState, &vec![2u32]).unwrap();

        assert!(store.remove(ArtifactSlot::TrainedClassifier).unwrap());
        assert!(!store.exists(ArtifactSlot::TrainedClassifier));
        assert!(store.exists(ArtifactSlot::ReducerState));
        assert!(!store.remove(ArtifactSlot::TrainedClassifier).unwrap());
    }

    #[test]
    fn missing_and_corrupt_artifacts() {
        let dir = camino_tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        let missing = store.load::<FeatureMatrix>(ArtifactSlot::ReducerState).unwrap_err();
        assert!(matches!(
            missing,
            StoreError::ArtifactMissing {
                slot: ArtifactSlot::ReducerState,
                ..
            }
        ));
        assert!(missing.is_rebuildable());

        std::fs::write(store.path(ArtifactSlot::TrainedClassifier), b"\x01").unwrap();
        let corrupt = store.load::<FeatureMatrix>(ArtifactSlot::TrainedClassifier).unwrap_err();
        assert!(matches!(corrupt, StoreError::ArtifactCorrupt { .. }), "{corrupt:?}");
        assert!(corrupt.is_rebuildable());
    }
}
