use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

/// File name of the persisted bearer token inside the config directory
pub const TOKEN_FILE: &str = "token";

/// Error type for token persistence
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("error reading token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error creating token directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error writing token file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error removing token file {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The single authentication token, mirrored to `<config-dir>/token`
#[derive(Debug)]
pub struct Session {
    token: String,
    token_path: PathBuf,
}

impl Session {
    /// An empty session whose token file lives in `config_dir`
    pub fn new(config_dir: &Path) -> Self {
        Session {
            token: String::new(),
            token_path: config_dir.join(TOKEN_FILE),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// The current token, if any
    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }

    /// Load the token from disk. A missing file leaves the session
    /// unauthenticated and is not an error.
    pub fn load_token(&mut self) -> Result<(), SessionError> {
        let raw = match fs::read_to_string(&self.token_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.token_path.display(), "token file does not exist");
                return Ok(());
            }
            Err(e) => {
                return Err(SessionError::Read {
                    path: self.token_path.clone(),
                    source: e,
                });
            }
        };
        self.token = raw.trim_end_matches(['\r', '\n']).to_string();
        debug!(authenticated = self.is_authenticated(), "token loaded");
        Ok(())
    }

    /// Set the in-memory token, then persist it.
    pub fn set_token(&mut self, token: &str) -> Result<(), SessionError> {
        self.token = token.to_string();

        if let Some(dir) = self.token_path.parent() {
            fs::create_dir_all(dir).map_err(|e| SessionError::CreateDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&self.token_path, token).map_err(|e| SessionError::Write {
            path: self.token_path.clone(),
            source: e,
        })?;
        info!("token saved");
        Ok(())
    }

    /// Forget the token and remove the token file (a missing file is fine).
    pub fn clear_token(&mut self) -> Result<(), SessionError> {
        self.token.clear();

        match fs::remove_file(&self.token_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SessionError::Remove {
                    path: self.token_path.clone(),
                    source: e,
                });
            }
        }
        info!("token cleared");
        Ok(())
    }
}

/// Session shared between the event loop and the backend gateway
#[derive(Debug, Clone)]
pub struct SharedSession(Arc<RwLock<Session>>);

impl SharedSession {
    pub fn new(session: Session) -> Self {
        SharedSession(Arc::new(RwLock::new(session)))
    }

    pub fn is_authenticated(&self) -> bool {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token()
            .map(str::to_string)
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_token(token)
    }

    pub fn clear_token(&self) -> Result<(), SessionError> {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_token()
    }
}
