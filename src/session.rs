//! Persisted sign-in state.
//!
//! The bearer token and user profile live in a small file so a later run starts
//! signed in. A `Session` owns the in-memory copy; the HTTP client reads the token
//! from it and expires it when the backend answers 401.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{Credentials, User};
use crate::utils::clock::Clock;
use crate::utils::encryption::{CredentialCipher, CryptoError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Credential file error: {0}")]
    Io(#[from] io::Error),
    #[error("Credential file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Credential encryption error: {0}")]
    Crypto(#[from] CryptoError),
}

/// File-backed key-value store for the signed-in user's credentials.
pub struct CredentialStore {
    path: PathBuf,
    cipher: Option<CredentialCipher>,
}

impl CredentialStore {
    pub fn new(path: PathBuf, cipher: Option<CredentialCipher>) -> Self {
        Self { path, cipher }
    }

    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let cipher = config
            .credentials_key
            .as_deref()
            .map(CredentialCipher::from_hex)
            .transpose()?;
        Ok(Self::new(config.credentials_path.clone(), cipher))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<Credentials>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let json = match &self.cipher {
            Some(cipher) => cipher.open(&raw)?,
            None => raw.into_bytes(),
        };
        Ok(Some(serde_json::from_slice(&json)?))
    }

    pub fn save(&self, credentials: &Credentials) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(credentials)?;
        let contents = match &self.cipher {
            Some(cipher) => cipher.seal(&json)?.into_bytes(),
            None => json,
        };
        fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct Session {
    store: CredentialStore,
    current: RwLock<Option<Credentials>>,
    clock: Arc<dyn Clock>,
}

impl Session {
    /// Restore the stored credentials; an unreadable or expired entry starts signed out.
    pub fn load(store: CredentialStore, clock: Arc<dyn Clock>) -> Self {
        let stored = match store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring stored credentials at {}: {}", store.path().display(), e);
                None
            }
        };

        let session = Self {
            store,
            current: RwLock::new(stored),
            clock,
        };

        if session.current_credentials().is_some() {
            if session.is_authenticated() && !session.token_likely_expired() {
                if let Some(user) = session.current_user() {
                    info!("Restored session for {}", user.email);
                }
            } else {
                info!("Stored session is no longer valid, signing out");
                session.clear_quietly();
            }
        }

        session
    }

    pub fn token(&self) -> Option<String> {
        self.current_credentials()
            .map(|c| c.token)
            .filter(|t| !t.is_empty())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_credentials().map(|c| c.user)
    }

    /// Signed in means a non-empty token and a user with an id.
    pub fn is_authenticated(&self) -> bool {
        self.current_credentials()
            .is_some_and(|c| !c.token.is_empty() && c.user.id != 0)
    }

    pub fn sign_in(&self, credentials: Credentials) -> Result<(), SessionError> {
        self.store.save(&credentials)?;
        debug!("Stored credentials for user {}", credentials.user.id);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.store.clear()
    }

    /// Drop the credentials after the backend rejected the token.
    pub fn expire(&self) {
        if self.current_credentials().is_some() {
            warn!("Backend rejected the session token, signing out");
        }
        self.clear_quietly();
    }

    /// Decode the JWT payload (without verifying it) and compare `exp` with now.
    ///
    /// Anything that is not a three-part JWT counts as expired.
    pub fn token_likely_expired(&self) -> bool {
        let Some(token) = self.token() else {
            return true;
        };
        match jwt_expiry(&token) {
            Ok(Some(exp)) => exp < self.clock.now_millis() / 1000,
            Ok(None) => false,
            Err(reason) => {
                debug!("Unreadable session token: {}", reason);
                true
            }
        }
    }

    fn current_credentials(&self) -> Option<Credentials> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear_quietly(&self) {
        if let Err(e) = self.sign_out() {
            warn!("Failed to clear stored credentials: {}", e);
        }
    }
}

/// `exp` claim of a JWT, if present.
fn jwt_expiry(token: &str) -> Result<Option<i64>, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 segments, found {}", parts.len()));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| format!("payload is not base64url: {}", e))?;
    let claims: serde_json::Value =
        serde_json::from_slice(&payload).map_err(|e| format!("payload is not JSON: {}", e))?;

    Ok(claims.get("exp").and_then(serde_json::Value::as_i64))
}
