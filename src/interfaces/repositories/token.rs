use std::{fs, io::ErrorKind, path::PathBuf};

use parking_lot::Mutex;
use zeroize::Zeroizing;

use crate::{errors::{AppError, SessionError}, repositories::auth::TokenStore};

/// Keeps the bearer token in a session file between CLI invocations.
///
/// The file is read once; later lookups and writes go through the in-memory copy.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: Mutex<Option<Option<Zeroizing<String>>>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    fn read(&self) -> Result<Option<Zeroizing<String>>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = Zeroizing::new(raw);
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Zeroizing::new(token.to_string())))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::TokenStorage(e.to_string()).into()),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<Zeroizing<String>>, AppError> {
        let mut cached = self.cached.lock();
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.read()?;
        *cached = Some(token.clone());
        Ok(token)
    }

    fn set(&self, token: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SessionError::TokenStorage(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| SessionError::TokenStorage(e.to_string()))?;
        *self.cached.lock() = Some(Some(Zeroizing::new(token.to_string())));
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.cached.lock() = Some(None);
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::TokenStorage(e.to_string()).into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Zeroizing<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        MemoryTokenStore {
            token: Mutex::new(Some(Zeroizing::new(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<Zeroizing<String>>, AppError> {
        Ok(self.token.lock().clone())
    }

    fn set(&self, token: &str) -> Result<(), AppError> {
        *self.token.lock() = Some(Zeroizing::new(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.token.lock().take();
        Ok(())
    }
}
