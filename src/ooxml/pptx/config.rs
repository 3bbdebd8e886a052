//! Load-time limits.
//!
//! The limits are process-wide: [`Limits::global`] is consulted by every
//! `Presentation::open*` call that does not pass explicit limits. They can be
//! set programmatically or loaded from YAML:
//!
//! ```
//! use slidekit::ooxml::pptx::Limits;
//!
//! let limits = Limits::from_yaml("max_slides: 40\n").unwrap();
//! assert_eq!(limits.max_slides, 40);
//! assert_eq!(limits.max_package_size, Limits::default().max_package_size);
//! ```

use crate::ooxml::error::{OoxmlError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum package size: 250 MiB.
pub const DEFAULT_MAX_PACKAGE_SIZE: u64 = 250 * 1024 * 1024;

/// Default maximum number of slides.
pub const DEFAULT_MAX_SLIDES: usize = 300;

static GLOBAL_LIMITS: Lazy<RwLock<Limits>> = Lazy::new(|| RwLock::new(Limits::default()));

/// Package size and slide count accepted when opening a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum package size in bytes
    pub max_package_size: u64,
    /// Maximum number of slides
    pub max_slides: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_package_size: DEFAULT_MAX_PACKAGE_SIZE,
            max_slides: DEFAULT_MAX_SLIDES,
        }
    }
}

impl Limits {
    /// Current process-wide limits.
    pub fn global() -> Limits {
        *GLOBAL_LIMITS.read()
    }

    /// Replace the process-wide limits.
    pub fn set_global(limits: Limits) {
        log::debug!(
            "presentation limits set to {} bytes / {} slides",
            limits.max_package_size,
            limits.max_slides
        );
        *GLOBAL_LIMITS.write() = limits;
    }

    /// Parse limits from YAML; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Limits> {
        serde_saphyr::from_str(yaml).map_err(|e| OoxmlError::Config(e.to_string()))
    }

    /// Read limits from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Limits> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Serialize as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| OoxmlError::Config(e.to_string()))
    }
}
