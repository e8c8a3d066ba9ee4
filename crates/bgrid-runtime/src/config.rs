#![forbid(unsafe_code)]

//! Session configuration as data.
//!
//! Groups the grid pattern, the calendar, and the undo history limits into a
//! single [`BracketConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # bracketgrid.toml
//! print_margin = 2
//!
//! [grid]
//! first_day_column = 3
//! default_game_rows = 11
//!
//! [schedule]
//! first_day = "2026-06-06"
//! fields = ["North", "South", "East"]
//!
//! [undo]
//! max_depth = 50
//! ```
//!
//! ```rust,ignore
//! let config = BracketConfig::from_toml_file("bracketgrid.toml")?;
//! let config = BracketConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every section may be omitted; missing keys take the values of
//! `BracketConfig::default()`.

use std::path::Path;

use bgrid_layout::{GridPattern, GridSettings, ScheduleConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::undo::UndoConfig;

/// Everything a session needs to know besides the bracket itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    /// Column pattern and block sizes.
    pub grid: GridPattern,

    /// Calendar and field rotation.
    pub schedule: ScheduleConfig,

    /// Undo history limits.
    pub undo: UndoConfig,

    /// Cells added around the covered area by `print_area`.
    pub print_margin: u32,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            grid: GridPattern::default(),
            schedule: ScheduleConfig::default(),
            undo: UndoConfig::default(),
            print_margin: 1,
        }
    }
}

impl BracketConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Team, line, output, line, team.
        if self.grid.min_game_rows < 5 {
            errors.push(format!(
                "grid.min_game_rows must be >= 5, got {}",
                self.grid.min_game_rows
            ));
        }
        if self.grid.default_game_rows < self.grid.min_game_rows {
            errors.push(format!(
                "grid.default_game_rows must be >= grid.min_game_rows ({}), got {}",
                self.grid.min_game_rows, self.grid.default_game_rows
            ));
        }

        if self.schedule.fields.is_empty() {
            errors.push("schedule.fields must name at least one field".into());
        }
        if self.schedule.fields.iter().any(|field| field.trim().is_empty()) {
            errors.push("schedule.fields must not contain blank names".into());
        }
        if self.schedule.slot_hours == 0 || self.schedule.slot_hours >= 24 {
            errors.push(format!(
                "schedule.slot_hours must be in 1..24, got {}",
                self.schedule.slot_hours
            ));
        }

        if self.undo.max_depth == 0 {
            errors.push("undo.max_depth must be > 0".into());
        }

        errors
    }

    /// Fail with every validation error at once.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// The layout rules handed to grid models.
    #[must_use]
    pub fn settings(&self) -> GridSettings {
        GridSettings {
            pattern: self.grid.clone(),
            schedule: self.schedule.clone(),
        }
    }

    /// Serialize to a JSONL-compatible summary line.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        serde_json::json!({
            "schema": "bracket-config-v1",
            "first_day_column": self.grid.first_day_column,
            "default_game_rows": self.grid.default_game_rows,
            "min_game_rows": self.grid.min_game_rows,
            "first_day": self.schedule.first_day,
            "fields": self.schedule.fields.len(),
            "slot_hours": self.schedule.slot_hours,
            "undo_max_depth": self.undo.max_depth,
            "print_margin": self.print_margin,
        })
        .to_string()
    }
}

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),

    /// Parsed, but out of range.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BracketConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = BracketConfig::from_toml_str("").unwrap();
        assert_eq!(config, BracketConfig::default());
    }

    #[test]
    fn partial_toml_override_preserves_defaults() {
        let config = BracketConfig::from_toml_str(
            r#"
            print_margin = 2

            [schedule]
            fields = ["North", "South", "East"]
            "#,
        )
        .unwrap();
        assert_eq!(config.print_margin, 2);
        assert_eq!(config.schedule.fields.len(), 3);
        assert_eq!(config.schedule.slot_hours, 3);
        assert_eq!(config.grid, GridPattern::default());
        assert_eq!(config.undo.max_depth, 100);
    }

    #[test]
    fn json_round_trip() {
        let mut config = BracketConfig::default();
        config.undo.max_depth = 7;
        config.grid.first_day_column = 1;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BracketConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let result = BracketConfig::from_toml_str("print_margin = \"wide\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validate_catches_short_blocks() {
        let mut config = BracketConfig::default();
        config.grid.min_game_rows = 3;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("grid.min_game_rows")));
    }

    #[test]
    fn validate_catches_default_below_minimum() {
        let mut config = BracketConfig::default();
        config.grid.default_game_rows = 5;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("grid.default_game_rows")));
    }

    #[test]
    fn validate_catches_missing_fields() {
        let mut config = BracketConfig::default();
        config.schedule.fields.clear();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("schedule.fields")));
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let mut config = BracketConfig::default();
        config.schedule.slot_hours = 0;
        config.undo.max_depth = 0;
        config.schedule.fields = vec![" ".into()];
        let errors = config.validate();
        assert!(errors.len() >= 3, "should catch multiple errors: {errors:?}");
        assert!(matches!(config.validated(), Err(ConfigError::Invalid(list)) if list.len() >= 3));
    }

    #[test]
    fn to_jsonl_produces_valid_json() {
        let jsonl = BracketConfig::default().to_jsonl();
        let value: serde_json::Value = serde_json::from_str(&jsonl).unwrap();
        assert_eq!(value["schema"], "bracket-config-v1");
        assert_eq!(value["first_day"], "2026-06-06");
        assert!(!jsonl.contains('\n'));
    }
}
