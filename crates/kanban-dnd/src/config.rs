//! Client Configuration
//!
//! Deployment settings injected by the host page. Every field has a default
//! so an empty object is a valid config.

use serde::{Deserialize, Serialize};

use crate::autoscroll::AutoScrollConfig;
use crate::error::ConfigError;
use crate::notify::TOAST_TTL_MS;
use crate::pulse::PULSE_WINDOW_MS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the REST API, without trailing slash
    pub api_base: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Server-sent events endpoint
    pub events_path: String,
    pub pulse_ms: u64,
    pub toast_ms: u64,
    /// Pointer travel (px) before a press becomes a drag
    pub drag_threshold_px: i32,
    /// Lines kept by the in-memory logger
    pub log_capacity: usize,
    pub autoscroll: AutoScrollConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            token: None,
            events_path: "/events".to_string(),
            pulse_ms: PULSE_WINDOW_MS,
            toast_ms: TOAST_TTL_MS,
            drag_threshold_px: 5,
            log_capacity: 500,
            autoscroll: AutoScrollConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validated()
    }

    /// Normalize and sanity-check a deserialized config
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        while self.api_base.ends_with('/') {
            self.api_base.pop();
        }
        if self.autoscroll.min_speed > self.autoscroll.max_speed {
            return Err(ConfigError::Invalid(format!(
                "autoscroll.minSpeed {} exceeds maxSpeed {}",
                self.autoscroll.min_speed, self.autoscroll.max_speed
            )));
        }
        if self.drag_threshold_px < 0 {
            return Err(ConfigError::Invalid("dragThresholdPx must not be negative".to_string()));
        }
        Ok(self)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}
