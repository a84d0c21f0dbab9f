//! Game settings and debug toggles
//!
//! Loaded from JSON on native and from the page URL query in the browser.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
use crate::sim::GameMode;

/// Errors raised while reading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Malformed JSON document
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown control scheme name
    #[error("unknown mode '{0}' (expected orientation or grapple)")]
    InvalidMode(String),

    /// Query value that should have been a number
    #[error("invalid number for '{key}': {value}")]
    InvalidNumber { key: String, value: String },
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "orientation" | "flip" | "1" => Some(GameMode::Orientation),
            "grapple" | "hook" | "2" => Some(GameMode::Grapple),
            _ => None,
        }
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Control scheme
    pub mode: GameMode,
    /// Fixed run seed (random when unset)
    pub seed: Option<u64>,

    // === Debug HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show drawable node count
    pub show_node_count: bool,
    /// Outline collision shapes
    pub show_physics: bool,

    // === Scene ===
    /// Scene width override (points)
    pub scene_width: Option<f32>,
    /// Scene height override (points)
    pub scene_height: Option<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Orientation,
            seed: None,

            // Debug overlays on, as during development
            show_fps: true,
            show_node_count: true,
            show_physics: false,

            scene_width: None,
            scene_height: None,
        }
    }
}

impl Settings {
    /// Parse a JSON settings document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `key=value` pairs from a URL query string (leading `?` optional).
    ///
    /// Recognised keys: `mode`, `seed`, `debug` (all debug overlays), `fps`,
    /// `nodes`, `physics`, `width`, `height`. Unknown keys are ignored.
    pub fn apply_query(&mut self, query: &str) -> Result<(), SettingsError> {
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            match key {
                "mode" => {
                    self.mode = GameMode::from_str(value)
                        .ok_or_else(|| SettingsError::InvalidMode(value.to_string()))?;
                }
                "seed" => self.seed = Some(parse_number(key, value)?),
                "debug" => {
                    let on = parse_flag(value);
                    self.show_fps = on;
                    self.show_node_count = on;
                    self.show_physics = on;
                }
                "fps" => self.show_fps = parse_flag(value),
                "nodes" => self.show_node_count = parse_flag(value),
                "physics" => self.show_physics = parse_flag(value),
                "width" => self.scene_width = Some(parse_number(key, value)?),
                "height" => self.scene_height = Some(parse_number(key, value)?),
                _ => log::debug!("Ignoring unknown query key '{}'", key),
            }
        }
        Ok(())
    }

    /// Settings from defaults plus a URL query string
    pub fn from_query(query: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        settings.apply_query(query)?;
        Ok(settings)
    }

    /// Scene size with overrides applied, falling back to a portrait phone
    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(
            self.scene_width.unwrap_or(DEFAULT_SCENE_WIDTH),
            self.scene_height.unwrap_or(DEFAULT_SCENE_HEIGHT),
        )
    }

    /// Whether any debug overlay is active
    pub fn any_debug(&self) -> bool {
        self.show_fps || self.show_node_count || self.show_physics
    }

    /// Load settings from the page URL query (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window().and_then(|w| w.location().search().ok());

        match query {
            Some(query) if !query.is_empty() => match Self::from_query(&query) {
                Ok(settings) => {
                    log::info!("Loaded settings from URL: {}", query);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring URL settings: {}", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from an optional JSON file path (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: Option<&str>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Self::default()
            }
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value, "0" | "false" | "off" | "no")
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}
