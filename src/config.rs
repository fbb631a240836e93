//! Planning rules and TOML-based scenario configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::input::PlanInput;

/// Pile count reported when no grid allocation caps the plan.
pub const UNLIMITED_PILES: u64 = 10_000_000_000;

/// Engineering rules of thumb used by the calculator.
///
/// Read-only once constructed; every evaluation receives it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanningRules {
    /// Width of one heavy-truck stall along the row (m).
    pub stall_width_m: f64,
    /// Grid capacity provisioned per pile (kVA).
    pub kva_per_pile: f64,
    /// Per-pile factor behind the legacy `transformer_required_kva` field (kVA).
    pub legacy_kva_per_pile: f64,
    /// Approved grid allocation (kVA). `None` leaves the pile count uncapped.
    pub grid_allocation_kva: Option<f64>,
}

impl Default for PlanningRules {
    fn default() -> Self {
        Self {
            stall_width_m: 6.0,
            kva_per_pile: 400.0,
            legacy_kva_per_pile: 200.0,
            grid_allocation_kva: None,
        }
    }
}

impl PlanningRules {
    /// Shortest site that fits two stalls.
    pub fn min_length_m(&self) -> f64 {
        self.stall_width_m * 2.0
    }

    /// Maximum piles the grid allocation supports.
    ///
    /// Returns [`UNLIMITED_PILES`] without an allocation.
    pub fn pile_ceiling(&self) -> u64 {
        match self.grid_allocation_kva {
            Some(kva) if kva.is_finite() && self.kva_per_pile > 0.0 => {
                (kva / self.kva_per_pile).floor().max(0.0) as u64
            }
            _ => UNLIMITED_PILES,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"rules.stall_width_m"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A planning scenario: site input plus the rules to evaluate it with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Site and economic input. Lenient: bad values fall back to defaults.
    #[serde(default)]
    pub input: PlanInput,
    /// Planning rules.
    #[serde(default)]
    pub rules: PlanningRules,
}

impl ScenarioConfig {
    /// Mid-size two-row depot with typical tariffs.
    pub fn baseline() -> Self {
        Self {
            input: PlanInput {
                site_location: "Baseline depot".to_string(),
                site_length_m: 120.0,
                site_width_m: 60.0,
                rent_yuan_per_sqm_month: 2.0,
                staff_count: 4,
                salary_yuan_per_month: 6000.0,
                ..PlanInput::default()
            },
            rules: PlanningRules::default(),
        }
    }

    /// Narrow roadside plot that fits a single row around one transformer.
    pub fn single_row() -> Self {
        Self {
            input: PlanInput {
                site_location: "Roadside plot".to_string(),
                site_length_m: 66.0,
                site_width_m: 36.0,
                rent_yuan_per_sqm_month: 1.5,
                staff_count: 2,
                salary_yuan_per_month: 5500.0,
                ..PlanInput::default()
            },
            rules: PlanningRules::default(),
        }
    }

    /// Baseline site in a high-rent logistics park.
    pub fn high_rent() -> Self {
        let base = Self::baseline();
        Self {
            input: PlanInput {
                site_location: "Logistics park".to_string(),
                rent_yuan_per_sqm_month: 25.0,
                staff_count: 8,
                ..base.input
            },
            rules: base.rules,
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "single_row", "high_rent"];

    /// Loads a scenario from a named preset.
    ///
    /// # Arguments
    ///
    /// * `name` - One of [`Self::PRESETS`]
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "single_row" => Ok(Self::single_row()),
            "high_rent" => Ok(Self::high_rent()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Scenario file with optional `[input]` and `[rules]` tables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Arguments
    ///
    /// * `s` - TOML document with optional `[input]` and `[rules]` tables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or `[rules]` has unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates the planning rules and returns a list of errors.
    ///
    /// Inputs are never rejected here; the calculator absorbs bad values.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let r = &self.rules;

        if !(r.stall_width_m.is_finite() && r.stall_width_m > 0.0) {
            errors.push(ConfigError::new("rules.stall_width_m", "must be > 0"));
        }
        if !(r.kva_per_pile.is_finite() && r.kva_per_pile > 0.0) {
            errors.push(ConfigError::new("rules.kva_per_pile", "must be > 0"));
        }
        if !(r.legacy_kva_per_pile.is_finite() && r.legacy_kva_per_pile >= 0.0) {
            errors.push(ConfigError::new("rules.legacy_kva_per_pile", "must be >= 0"));
        }
        if let Some(kva) = r.grid_allocation_kva {
            if !(kva.is_finite() && kva >= 0.0) {
                errors.push(ConfigError::new("rules.grid_allocation_kva", "must be >= 0"));
            }
        }

        errors
    }
}
