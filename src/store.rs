use std::{
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::types::Credential;

/// A single persistent slot holding at most one bearer credential.
///
/// Every component reads through this trait at time of use rather than caching
/// the credential, so a `remove` takes effect everywhere on the next read.
/// Reads and writes are synchronous; implementations must not touch the
/// network.
pub trait CredentialStore: Send + Sync + 'static {
    /// The stored credential, if any.
    fn get(&self) -> Option<Credential>;

    /// Store the credential, overwriting any previous one.
    fn set(&self, credential: &Credential);

    /// Clear the slot. A no-op when it is already empty.
    fn remove(&self);
}

pub type SharedStore = Arc<dyn CredentialStore>;

/// In-process store with no persistence. The substitute used in tests.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Option<Credential> {
        self.slot.lock().unwrap().clone()
    }

    fn set(&self, credential: &Credential) {
        *self.slot.lock().unwrap() = Some(credential.clone());
    }

    fn remove(&self) {
        *self.slot.lock().unwrap() = None;
    }
}

/// File-backed store, the local-storage analogue: one file holding the raw
/// credential string, surviving process restarts.
///
/// I/O failures are logged and otherwise swallowed; a slot that cannot be
/// read is indistinguishable from an empty one, which matches how a missing
/// credential is treated everywhere else.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> Option<Credential> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.is_empty() => None,
            Ok(raw) => Some(Credential(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read credential slot");
                None
            }
        }
    }

    fn set(&self, credential: &Credential) {
        if let Err(e) = fs::write(&self.path, &credential.0) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write credential slot");
        }
    }

    fn remove(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clear credential slot");
            }
        }
    }
}
