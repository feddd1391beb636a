//! Local Filesystem Store
//!
//! The write runs on the blocking pool and outlives the caller. If the caller
//! stops waiting (deadline, dropped request), whichever side finishes last
//! deletes the file, so a half-written upload is never left under the served
//! directory.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::store::{StoreError, StoreResult};

use crate::domain::storage::FileStore;

/// Stores files under `{root}/images/{subdir}/`
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for DiskFileStore {
    async fn save(&self, subdir: &str, filename: &str, bytes: &[u8]) -> StoreResult<()> {
        let dir = self.root.join("images").join(subdir);
        let path = dir.join(filename);
        let state = Arc::new(WriteState::default());
        let mut guard = AbandonGuard {
            path: path.clone(),
            state: state.clone(),
            armed: true,
        };

        let bytes = bytes.to_vec();
        let job = tokio::task::spawn_blocking(move || write_new_file(&dir, &path, &bytes, &state));

        let outcome = job.await.map_err(StoreError::backend)?;
        guard.armed = false;
        outcome
    }
}

/// Flags shared by the blocking writer and the awaiting caller
#[derive(Debug, Default)]
struct WriteState {
    created: AtomicBool,
    abandoned: AtomicBool,
}

/// Deletes the file when the caller gives up before the writer reports back
struct AbandonGuard {
    path: PathBuf,
    state: Arc<WriteState>,
    armed: bool,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.abandoned.store(true, Ordering::SeqCst);
        if self.state.created.load(Ordering::SeqCst) {
            let _ = std::fs::remove_file(&self.path);
            tracing::warn!(path = %self.path.display(), "Abandoned upload removed");
        }
    }
}

fn write_new_file(dir: &Path, path: &Path, bytes: &[u8], state: &WriteState) -> StoreResult<()> {
    std::fs::create_dir_all(dir).map_err(StoreError::backend)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => StoreError::Conflict,
            _ => StoreError::backend(e),
        })?;
    // Only a file this call created may be deleted
    state.created.store(true, Ordering::SeqCst);

    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        let _ = std::fs::remove_file(path);
        return Err(StoreError::backend(e));
    }

    if state.abandoned.load(Ordering::SeqCst) {
        let _ = std::fs::remove_file(path);
        return Err(StoreError::Timeout);
    }

    Ok(())
}
