// Persisted bearer token
//
// The token lives in a single-line file so a session survives restarts.
// The in-memory copy is shared between the UI thread and request tasks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    current: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// Open the store, loading any token already on disk
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            current: Arc::new(RwLock::new(current)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Option<String> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }

    /// Persist a new token and make it current
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;
        if let Ok(mut guard) = self.current.write() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    /// Forget the token in memory and on disk
    ///
    /// Clearing an already-empty store is a no-op.
    pub fn clear(&self) -> io::Result<()> {
        if let Ok(mut guard) = self.current.write() {
            *guard = None;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
