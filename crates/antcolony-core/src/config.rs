use crate::resource::FoodLayout;
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Tunables consumed by [`crate::world::World`] at the start of every step.
///
/// Deserializing fills missing keys from [`SimConfig::default`]. A host that
/// sends only the values its controls changed should go through
/// [`SimConfig::with_overrides`] on the live config instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    /// Initial viewport; kept in sync with the world by `World::resize`.
    pub width: f64,
    pub height: f64,
    /// Population size used by the next `reset_ants`/`restart`.
    pub ant_count: usize,
    pub ant_speed: f64,
    pub max_turn_angle: f64,
    pub sensor_offset: f64,
    pub sensor_angle: f64,
    pub evaporation_rate: f32,
    pub diffusion_alpha: f32,
    pub deposit_searching: f32,
    pub deposit_carrying: f32,
    pub cell_size: f64,
    pub nest_radius: f64,
    pub food_radius: f64,
    /// Where `restart`/`seed_default_food` place the starting food.
    pub food_layout: FoodLayout,
    // Render toggles, carried through to the snapshot untouched.
    pub show_field: bool,
    pub show_agents: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimConfigError {
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be non-negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie in {range} (got {value})")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("ant_count ({actual}) exceeds supported maximum ({max})")]
    TooManyAnts { max: usize, actual: usize },
    #[error("pheromone grid ({actual} cells) exceeds supported maximum ({max})")]
    FieldTooLarge { max: usize, actual: usize },
}

impl SimConfig {
    pub const MAX_ANTS: usize = 100_000;
    pub const MAX_FIELD_CELLS: usize = 1 << 24;

    /// Wide canvas preset.
    pub fn desktop() -> Self {
        Self {
            seed: 42,
            width: 900.0,
            height: 600.0,
            ant_count: 250,
            ant_speed: 1.6,
            max_turn_angle: 0.3,
            sensor_offset: 10.0,
            sensor_angle: 0.5,
            evaporation_rate: 0.005,
            diffusion_alpha: 0.15,
            deposit_searching: 0.02,
            deposit_carrying: 0.9,
            cell_size: 3.0,
            nest_radius: 14.0,
            food_radius: 10.0,
            food_layout: FoodLayout::Wide,
            show_field: true,
            show_agents: true,
        }
    }

    /// Small portrait canvas with a lighter population and faster decay.
    pub fn mobile() -> Self {
        Self {
            width: 360.0,
            height: 420.0,
            ant_count: 160,
            ant_speed: 1.4,
            max_turn_angle: 0.32,
            evaporation_rate: 0.007,
            diffusion_alpha: 0.12,
            nest_radius: 12.0,
            food_layout: FoodLayout::Compact,
            ..Self::desktop()
        }
    }

    /// Grid dimensions `(cols, rows)` for a viewport. Casts saturate, so
    /// negative or NaN extents give 0 and huge ones give `usize::MAX`.
    pub fn grid_dims(width: f64, height: f64, cell_size: f64) -> (usize, usize) {
        (
            (width / cell_size).ceil() as usize,
            (height / cell_size).ceil() as usize,
        )
    }

    /// Copy of `self` with the keys of a JSON object replaced. Absent keys keep
    /// their current values rather than falling back to the defaults.
    pub fn with_overrides(&self, overrides: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(overrides) = serde_json::from_str(overrides)? else {
            return Err(serde_json::Error::custom("config overrides must be a JSON object"));
        };
        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        serde_json::from_value(merged)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("cell_size", self.cell_size)?;
        non_negative("ant_speed", self.ant_speed)?;
        non_negative("max_turn_angle", self.max_turn_angle)?;
        non_negative("sensor_offset", self.sensor_offset)?;
        finite("sensor_angle", self.sensor_angle)?;
        non_negative("deposit_searching", self.deposit_searching as f64)?;
        non_negative("deposit_carrying", self.deposit_carrying as f64)?;
        non_negative("nest_radius", self.nest_radius)?;
        non_negative("food_radius", self.food_radius)?;

        let evaporation = self.evaporation_rate as f64;
        finite("evaporation_rate", evaporation)?;
        if !(0.0..1.0).contains(&evaporation) {
            return Err(SimConfigError::OutOfRange {
                field: "evaporation_rate",
                range: "[0, 1)",
                value: evaporation,
            });
        }
        let alpha = self.diffusion_alpha as f64;
        finite("diffusion_alpha", alpha)?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(SimConfigError::OutOfRange {
                field: "diffusion_alpha",
                range: "[0, 1]",
                value: alpha,
            });
        }

        if self.ant_count > Self::MAX_ANTS {
            return Err(SimConfigError::TooManyAnts {
                max: Self::MAX_ANTS,
                actual: self.ant_count,
            });
        }
        check_field_size(self.width, self.height, self.cell_size)
    }
}

/// Rejects viewports whose pheromone grid would exceed `MAX_FIELD_CELLS`.
pub(crate) fn check_field_size(
    width: f64,
    height: f64,
    cell_size: f64,
) -> Result<(), SimConfigError> {
    let (cols, rows) = SimConfig::grid_dims(width, height, cell_size);
    let cells = cols.saturating_mul(rows);
    if cells > SimConfig::MAX_FIELD_CELLS {
        return Err(SimConfigError::FieldTooLarge {
            max: SimConfig::MAX_FIELD_CELLS,
            actual: cells,
        });
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), SimConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SimConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SimConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SimConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        assert_eq!(SimConfig::desktop().validate(), Ok(()));
        assert_eq!(SimConfig::mobile().validate(), Ok(()));
    }

    #[test]
    fn mobile_preset_shares_sensor_geometry() {
        let desktop = SimConfig::desktop();
        let mobile = SimConfig::mobile();
        assert_eq!(mobile.sensor_offset, desktop.sensor_offset);
        assert_eq!(mobile.cell_size, desktop.cell_size);
        assert!(mobile.ant_count < desktop.ant_count);
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let config = SimConfig {
            cell_size: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::NotPositive {
                field: "cell_size",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_negative_rates() {
        let config = SimConfig {
            evaporation_rate: -0.1,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::OutOfRange {
                field: "evaporation_rate",
                ..
            })
        ));

        let config = SimConfig {
            deposit_carrying: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::Negative {
                field: "deposit_carrying",
                ..
            })
        ));
    }

    #[test]
    fn rejects_full_evaporation() {
        let config = SimConfig {
            evaporation_rate: 1.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        let config = SimConfig {
            ant_speed: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::NotFinite {
                field: "ant_speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_oversized_population_and_grid() {
        let config = SimConfig {
            ant_count: SimConfig::MAX_ANTS + 1,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::TooManyAnts { .. })
        ));

        let config = SimConfig {
            width: 1.0e6,
            height: 1.0e6,
            cell_size: 1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::FieldTooLarge { .. })
        ));
    }

    #[test]
    fn partial_json_overlays_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"ant_count": 12, "seed": 7}"#).expect("valid json");
        assert_eq!(config.ant_count, 12);
        assert_eq!(config.seed, 7);
        assert_eq!(config.cell_size, SimConfig::default().cell_size);
    }

    #[test]
    fn overrides_keep_unlisted_values() {
        let base = SimConfig::mobile();
        let updated = base
            .with_overrides(r#"{"ant_speed": 2.0}"#)
            .expect("valid overrides");
        assert_eq!(updated.ant_speed, 2.0);
        assert_eq!(
            SimConfig {
                ant_speed: base.ant_speed,
                ..updated
            },
            base
        );
    }

    #[test]
    fn overrides_must_be_an_object() {
        let base = SimConfig::default();
        assert!(base.with_overrides("[1, 2]").is_err());
        assert!(base.with_overrides(r#"{"ant_count": "many"}"#).is_err());
    }

    #[test]
    fn mobile_preset_uses_compact_food_layout() {
        assert_eq!(SimConfig::desktop().food_layout, FoodLayout::Wide);
        assert_eq!(SimConfig::mobile().food_layout, FoodLayout::Compact);
        let config: SimConfig =
            serde_json::from_str(r#"{"food_layout": "compact"}"#).expect("valid json");
        assert_eq!(config.food_layout, FoodLayout::Compact);
    }

    #[test]
    fn grid_dims_round_up() {
        assert_eq!(SimConfig::grid_dims(10.0, 7.0, 3.0), (4, 3));
        assert_eq!(SimConfig::grid_dims(9.0, 6.0, 3.0), (3, 2));
        assert_eq!(SimConfig::grid_dims(-4.0, f64::NAN, 3.0), (0, 0));
    }
}
