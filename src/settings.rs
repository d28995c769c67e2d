use crate::keymap::EdgePolicy;
use crate::label::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "KEY_OVERLAY_SETTINGS";
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Delay between keyboard samples in milliseconds.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// Width available for key labels. Pixels for the window, columns when
    /// `headless` is set. If `None`, see [`Settings::display_width`].
    #[serde(default)]
    pub display_width: Option<u32>,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Top-left corner of the overlay window. If `None`, the window manager
    /// decides.
    #[serde(default)]
    pub window_pos: Option<(i32, i32)>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Appended to every key name.
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub edge_policy: EdgePolicy,
    /// Print keys to stdout instead of opening a window.
    #[serde(default)]
    pub headless: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Directory for a daily rotated log file in addition to stderr.
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_sample_interval_ms() -> u64 {
    16
}

pub const DEFAULT_WINDOW_WIDTH: u32 = 640;
/// Stays under an 80-column terminal so the line never wraps.
pub const DEFAULT_CONSOLE_COLUMNS: u32 = 79;

fn default_window_height() -> u32 {
    40
}

fn default_font_size() -> f32 {
    20.0
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            display_width: None,
            window_height: default_window_height(),
            window_pos: None,
            font_size: default_font_size(),
            separator: default_separator(),
            edge_policy: EdgePolicy::default(),
            headless: false,
            debug_logging: false,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Settings file path: `$KEY_OVERLAY_SETTINGS` or `settings.json`.
    pub fn default_path() -> String {
        std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string())
    }

    /// Missing or empty files yield the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Width budget: the configured value, else 640 pixels for the window
    /// or 79 columns in headless mode.
    pub fn display_width(&self) -> u32 {
        self.display_width.unwrap_or(if self.headless {
            DEFAULT_CONSOLE_COLUMNS
        } else {
            DEFAULT_WINDOW_WIDTH
        })
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "display_width": 300 }"#).unwrap();
        assert_eq!(settings.display_width(), 300);
        assert_eq!(settings.sample_interval_ms, 16);
        assert_eq!(settings.separator, " ");
        assert_eq!(settings.edge_policy, EdgePolicy::AllRising);
    }

    #[test]
    fn edge_policy_uses_snake_case() {
        let settings: Settings =
            serde_json::from_str(r#"{ "edge_policy": "lowest_per_byte" }"#).unwrap();
        assert_eq!(settings.edge_policy, EdgePolicy::LowestPerByte);
    }

    #[test]
    fn default_width_depends_on_surface() {
        let window: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(window.display_width(), DEFAULT_WINDOW_WIDTH);

        let headless: Settings = serde_json::from_str(r#"{ "headless": true }"#).unwrap();
        assert_eq!(headless.display_width(), DEFAULT_CONSOLE_COLUMNS);
        assert!(headless.display_width() < 80);

        let explicit: Settings =
            serde_json::from_str(r#"{ "headless": true, "display_width": 120 }"#).unwrap();
        assert_eq!(explicit.display_width(), 120);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let settings = Settings {
            sample_interval_ms: 0,
            ..Settings::default()
        };
        assert_eq!(settings.sample_interval(), Duration::from_millis(1));
    }
}
