#![forbid(unsafe_code)]

//! Drop-zone configuration.
//!
//! [`DropZoneConfig`] names the zone element and tunes geometry handling.
//! With the `config` feature it can be loaded from TOML or JSON:
//!
//! ```toml
//! zone_id = "report-actions-drop-zone"
//! active_zone_id = "active-drop-zone"
//! resize_throttle_ms = 100
//! responsive_breakpoint = 800.0
//! ```
//!
//! ```rust,ignore
//! let config = DropZoneConfig::from_toml_file("dropzone.toml")?;
//! let config = DropZoneConfig::from_json_str(json)?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::event::ElementId;

/// Default rate limit for resize-driven geometry refreshes.
pub const DEFAULT_RESIZE_THROTTLE_MS: u64 = 100;

/// Default viewport width (px) at or below which the layout is edge-to-edge.
pub const DEFAULT_RESPONSIVE_BREAKPOINT: f64 = 800.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DropZoneConfig {
    /// Element acting as the drop target.
    pub zone_id: ElementId,

    /// Element that, when left with no related target, means an OS file
    /// manager window now covers the zone (Chromium only).
    pub active_zone_id: ElementId,

    /// Whether the zone starts enabled.
    pub enabled: bool,

    /// Minimum interval between resize-driven geometry refreshes.
    pub resize_throttle_ms: u64,

    /// Viewport width at or below which horizontal edges are clamped.
    pub responsive_breakpoint: f64,
}

impl Default for DropZoneConfig {
    fn default() -> Self {
        Self {
            zone_id: ElementId::default(),
            active_zone_id: ElementId::default(),
            enabled: true,
            resize_throttle_ms: DEFAULT_RESIZE_THROTTLE_MS,
            responsive_breakpoint: DEFAULT_RESPONSIVE_BREAKPOINT,
        }
    }
}

impl DropZoneConfig {
    pub fn new(zone_id: impl Into<ElementId>, active_zone_id: impl Into<ElementId>) -> Self {
        Self {
            zone_id: zone_id.into(),
            active_zone_id: active_zone_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_resize_throttle(mut self, throttle: Duration) -> Self {
        self.resize_throttle_ms = u64::try_from(throttle.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_responsive_breakpoint(mut self, breakpoint: f64) -> Self {
        self.responsive_breakpoint = breakpoint;
        self
    }

    #[inline]
    pub fn resize_throttle(&self) -> Duration {
        Duration::from_millis(self.resize_throttle_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, DropZoneConfigError> {
        toml::from_str(s).map_err(DropZoneConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DropZoneConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DropZoneConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, DropZoneConfigError> {
        serde_json::from_str(s).map_err(DropZoneConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DropZoneConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DropZoneConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every field. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.zone_id.is_empty() {
            errors.push("zone_id must not be empty".to_string());
        }
        if self.active_zone_id.is_empty() {
            errors.push("active_zone_id must not be empty".to_string());
        }
        if self.resize_throttle_ms == 0 {
            errors.push("resize_throttle_ms must be > 0".to_string());
        }
        if !self.responsive_breakpoint.is_finite() || self.responsive_breakpoint < 0.0 {
            errors.push(format!(
                "responsive_breakpoint must be a finite, non-negative width, got {}",
                self.responsive_breakpoint
            ));
        }

        errors
    }

    /// Validate, returning the config on success.
    pub fn validated(self) -> Result<Self, DropZoneConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(DropZoneConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug)]
pub enum DropZoneConfigError {
    /// I/O error reading a file.
    #[cfg(feature = "config")]
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for DropZoneConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "config")]
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for DropZoneConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config")]
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
