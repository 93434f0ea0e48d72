//! Configuration store adapters.
//!
//! Both implement [`ConfigPort`]:
//!
//! - [`MemoryConfigStore`] keeps a postcard-encoded blob, the same layout
//!   a flash key-value partition would hold.  Used by tests and the
//!   simulator.
//! - [`JsonFileConfigStore`] keeps a human-editable JSON file.
//!
//! Both validate before persisting and after loading; a stored config
//! that fails validation is reported as corrupted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::ThermalConfig;
use crate::error::{Result, StorageError};

// ───────────────────────────────────────────────────────────────
// In-memory blob
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blob: Option<Vec<u8>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self { blob: None }
    }

    /// Raw stored bytes, if any.
    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    /// Overwrite the stored bytes (simulates flash corruption in tests).
    pub fn set_blob(&mut self, bytes: Vec<u8>) {
        self.blob = Some(bytes);
    }
}

impl ConfigPort for MemoryConfigStore {
    fn load(&self) -> Result<ThermalConfig> {
        let bytes = self.blob.as_deref().ok_or(StorageError::NotFound)?;
        let cfg: ThermalConfig =
            postcard::from_bytes(bytes).map_err(|_| StorageError::Corrupted)?;
        cfg.validate().map_err(|_| StorageError::Corrupted)?;
        info!("MemoryConfigStore: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&mut self, config: &ThermalConfig) -> Result<()> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| StorageError::IoError)?;
        info!("MemoryConfigStore: saved config ({} bytes)", bytes.len());
        self.blob = Some(bytes);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// JSON file
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfigStore {
    fn load(&self) -> Result<ThermalConfig> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                warn!("config read {}: {e}", self.path.display());
                StorageError::IoError
            }
        })?;
        let cfg: ThermalConfig =
            serde_json::from_str(&text).map_err(|_| StorageError::Corrupted)?;
        cfg.validate().map_err(|_| StorageError::Corrupted)?;
        info!("loaded config from {}", self.path.display());
        Ok(cfg)
    }

    fn save(&mut self, config: &ThermalConfig) -> Result<()> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| StorageError::IoError)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("config write {}: {e}", self.path.display());
            StorageError::IoError
        })?;
        info!("saved config to {}", self.path.display());
        Ok(())
    }
}
