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

use crate::store::ArtifactSlot;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors of the [super::ArtifactStore]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("The artifact {slot} does not exist at {path}.")]
    ArtifactMissing { slot: ArtifactSlot, path: Utf8PathBuf },
    #[error("The artifact {slot} at {path} can not be read: {source}")]
    ArtifactCorrupt {
        slot: ArtifactSlot,
        path: Utf8PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialisation(#[from] bincode::Error),
    #[error(transparent)]
    Persist(#[from] camino_tempfile::Utf8PersistError),
}

impl StoreError {
    /// Missing or unreadable artifacts can be rebuilt by the caller.
    pub fn is_rebuildable(&self) -> bool {
        matches!(
            self,
            StoreError::ArtifactMissing { .. } | StoreError::ArtifactCorrupt { .. }
        )
    }
}
