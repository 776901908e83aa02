//! Gemini API key resolution.
//!
//! Keys are resolved in priority order: key set for this session, key saved
//! in the key file, key from build-time environment configuration. A key
//! found in the file or environment is cached in memory for the rest of the
//! session.

use crate::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Sentinel left behind by `.env` templates; never a usable key.
const PLACEHOLDER_KEY: &str = "your_gemini_api_key_here";

pub struct CredentialStore {
    session_key: Mutex<Option<String>>,
    key_file: PathBuf,
    default_key: Option<String>,
}

impl CredentialStore {
    pub fn new(key_file: PathBuf, default_key: Option<String>) -> Self {
        Self {
            session_key: Mutex::new(None),
            key_file,
            default_key,
        }
    }

    /// Resolve a usable API key.
    ///
    /// Fails with [`Error::NotConfigured`] when no candidate exists or the
    /// winning candidate is the `.env` template placeholder.
    pub fn resolve(&self) -> Result<String> {
        let mut session = self.session_key.lock().unwrap();

        let key = session
            .clone()
            .or_else(|| self.read_key_file())
            .or_else(|| self.default_key.clone())
            .ok_or(Error::NotConfigured)?;

        if is_placeholder(&key) {
            return Err(Error::NotConfigured);
        }

        if session.is_none() {
            *session = Some(key.clone());
        }

        Ok(key)
    }

    /// Override the key for the rest of the session.
    pub fn set_session_key(&self, key: &str) {
        *self.session_key.lock().unwrap() = Some(key.to_string());
    }

    /// Save a key to the key file so later sessions pick it up.
    pub fn persist(&self, key: &str) -> Result<()> {
        fs::write(&self.key_file, key.trim())?;
        tracing::info!("Saved API key to {}", self.key_file.display());
        Ok(())
    }

    fn read_key_file(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.key_file).ok()?;
        let key = contents.trim();
        (!key.is_empty()).then(|| key.to_string())
    }
}

fn is_placeholder(key: &str) -> bool {
    key.is_empty() || key.to_lowercase().contains(PLACEHOLDER_KEY)
}
