use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

use crate::types::{Overlay, OverlayDraft, OverlayPatch};

#[derive(Debug, Error)]
pub enum StoreError {
  /// The backing file could not be opened or created at startup. Every
  /// operation short-circuits on this before touching storage.
  #[error("overlay store is not available")]
  Unavailable,
  #[error("overlay {0} not found")]
  NotFound(String),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("failed to encode store file: {0}")]
  Encode(#[from] serde_json::Error),
}

/// Result of an update against an existing overlay.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
  Updated(Overlay),
  /// The id matched but the merged document equals the stored one.
  /// This is a defined non-error outcome, not a suppressed failure.
  Unchanged(Overlay),
}

impl UpdateOutcome {
  pub fn overlay(&self) -> &Overlay {
    match self {
      Self::Updated(o) | Self::Unchanged(o) => o,
    }
  }
}

/// On-disk layout: one JSON document holding the single named collection,
/// keyed by overlay id.
#[derive(Debug, Default, Deserialize)]
struct StoreFile {
  overlays: BTreeMap<String, Overlay>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
  overlays: &'a BTreeMap<String, Overlay>,
}

enum StoreState {
  Available(BTreeMap<String, Overlay>),
  Unavailable,
}

/// File-backed overlay collection with defensive initialization.
///
/// `open` never fails past its caller: a corrupt file is quarantined and
/// replaced with a fresh empty store; anything worse degrades the store to
/// an explicit unavailable state that every operation checks first.
pub struct OverlayStore {
  path: PathBuf,
  state: Mutex<StoreState>,
}

impl OverlayStore {
  pub async fn open(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let state = match Self::load_or_recover(&path).await {
      Ok(overlays) => {
        tracing::info!("overlay store ready at {}", path.display());
        StoreState::Available(overlays)
      }
      Err(err) => {
        tracing::error!(
          "overlay store initialization failed for {}: {}",
          path.display(),
          err
        );
        StoreState::Unavailable
      }
    };
    Self {
      path,
      state: Mutex::new(state),
    }
  }

  async fn load_or_recover(path: &Path) -> Result<BTreeMap<String, Overlay>, StoreError> {
    if !fs::try_exists(path).await? {
      Self::write_file(path, &BTreeMap::new()).await?;
      return Ok(BTreeMap::new());
    }

    let raw = fs::read_to_string(path).await?;
    match serde_json::from_str::<StoreFile>(&raw) {
      Ok(file) => Ok(file.overlays),
      Err(err) => {
        // Quarantine the corrupt file, never delete it.
        let backup = format!(
          "{}.corrupted.{}",
          path.display(),
          Utc::now().format("%Y%m%d%H%M%S")
        );
        tracing::error!(
          "store file {} is corrupted ({}); moving it to {}",
          path.display(),
          err,
          backup
        );
        fs::rename(path, &backup).await?;
        Self::write_file(path, &BTreeMap::new()).await?;
        Ok(BTreeMap::new())
      }
    }
  }

  /// Rewrite the whole store through a temp file so a crash mid-write
  /// cannot corrupt the original.
  async fn write_file(
    path: &Path,
    overlays: &BTreeMap<String, Overlay>,
  ) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).await?;
      }
    }
    let encoded = serde_json::to_vec_pretty(&StoreFileRef { overlays })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &encoded).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
  }

  pub async fn is_available(&self) -> bool {
    matches!(&*self.state.lock().await, StoreState::Available(_))
  }

  /// Insert a new overlay built from the draft. Every call creates a new
  /// record; there is no duplicate or merge check.
  pub async fn create(&self, draft: OverlayDraft) -> Result<Overlay, StoreError> {
    let mut state = self.state.lock().await;
    let overlays = match &mut *state {
      StoreState::Available(overlays) => overlays,
      StoreState::Unavailable => return Err(StoreError::Unavailable),
    };

    let overlay = Overlay::create(draft);
    overlays.insert(overlay.id.clone(), overlay.clone());
    Self::write_file(&self.path, overlays).await?;
    tracing::info!("created overlay {}", overlay.id);
    Ok(overlay)
  }

  /// All overlays in storage order. An empty collection is an empty vec.
  pub async fn list(&self) -> Result<Vec<Overlay>, StoreError> {
    let state = self.state.lock().await;
    match &*state {
      StoreState::Available(overlays) => Ok(overlays.values().cloned().collect()),
      StoreState::Unavailable => Err(StoreError::Unavailable),
    }
  }

  /// Field-level merge of `patch` into the overlay with `id`.
  ///
  /// The store has no affected-count primitive, so the document is looked
  /// up first: a missing id is `NotFound`, a merge that changes nothing is
  /// the `Unchanged` outcome (and skips the file write). The returned
  /// overlay is always the stored state, never the submitted patch.
  pub async fn update(
    &self,
    id: &str,
    patch: OverlayPatch,
  ) -> Result<UpdateOutcome, StoreError> {
    let mut state = self.state.lock().await;
    let overlays = match &mut *state {
      StoreState::Available(overlays) => overlays,
      StoreState::Unavailable => return Err(StoreError::Unavailable),
    };

    let existing = overlays
      .get(id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    let mut merged = existing.clone();
    patch.apply(&mut merged);
    if merged == existing {
      tracing::info!("update for overlay {} needed no change", id);
      return Ok(UpdateOutcome::Unchanged(existing));
    }

    overlays.insert(id.to_string(), merged);
    Self::write_file(&self.path, overlays).await?;
    // Re-read from the collection so the response reflects persisted state.
    let stored = overlays
      .get(id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    tracing::info!("updated overlay {}", id);
    Ok(UpdateOutcome::Updated(stored))
  }

  /// Remove the overlay with `id`; `NotFound` if nothing matched.
  pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
    let mut state = self.state.lock().await;
    let overlays = match &mut *state {
      StoreState::Available(overlays) => overlays,
      StoreState::Unavailable => return Err(StoreError::Unavailable),
    };

    if overlays.remove(id).is_none() {
      return Err(StoreError::NotFound(id.to_string()));
    }
    Self::write_file(&self.path, overlays).await?;
    tracing::info!("deleted overlay {}", id);
    Ok(())
  }
}
