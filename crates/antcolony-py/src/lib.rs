//! PyO3 bindings: one `Colony` handle per view, driven by the host's frame loop.
use antcolony_core::{SimConfig, World};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// JSON for a named preset (`"desktop"` or `"mobile"`).
#[pyfunction]
#[pyo3(signature = (preset = "desktop"))]
fn default_config_json(preset: &str) -> PyResult<String> {
    let config = preset_config(preset)?;
    serde_json::to_string(&config).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn preset_config(preset: &str) -> PyResult<SimConfig> {
    match preset {
        "desktop" => Ok(SimConfig::desktop()),
        "mobile" => Ok(SimConfig::mobile()),
        other => Err(PyValueError::new_err(format!("unknown preset: {other}"))),
    }
}

fn parse_config(json: &str) -> PyResult<SimConfig> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("invalid config: {e}")))
}

fn finite_point(x: f64, y: f64) -> PyResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(PyValueError::new_err(format!(
            "coordinates must be finite (got {x}, {y})"
        )))
    }
}

#[pyclass(name = "Colony")]
struct PyColony {
    world: World,
}

#[pymethods]
impl PyColony {
    #[new]
    #[pyo3(signature = (config_json = None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => parse_config(json)?,
            None => SimConfig::default(),
        };
        let world = World::try_new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { world })
    }

    /// Advance one tick; returns the step's wall time in microseconds.
    fn step(&mut self) -> u64 {
        self.world.step().total_us
    }

    fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
        self.world
            .resize(width, height)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn reset_ants(&mut self, count: usize) {
        self.world.reset_ants(count);
    }

    fn restart(&mut self) {
        self.world.restart();
    }

    fn add_food_at(&mut self, x: f64, y: f64) -> PyResult<()> {
        finite_point(x, y)?;
        self.world.add_food_at(x, y);
        Ok(())
    }

    /// Returns whether a source was removed.
    fn remove_food_at(&mut self, x: f64, y: f64) -> PyResult<bool> {
        finite_point(x, y)?;
        Ok(self.world.remove_food_at(x, y).is_some())
    }

    fn clear_food(&mut self) {
        self.world.clear_food();
    }

    fn seed_default_food(&mut self) {
        self.world.seed_default_food();
    }

    /// Apply a JSON object of changed tunables; unlisted keys keep their current values.
    fn set_config(&mut self, config_json: &str) -> PyResult<()> {
        let config = self
            .world
            .config()
            .with_overrides(config_json)
            .map_err(|e| PyValueError::new_err(format!("invalid config: {e}")))?;
        self.world
            .set_config(config)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn config_json(&self) -> PyResult<String> {
        serde_json::to_string(self.world.config()).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Row-major pheromone values; see `field_shape`.
    fn field(&self) -> Vec<f32> {
        self.world.field().data().to_vec()
    }

    /// `(cols, rows, cell_size)`.
    fn field_shape(&self) -> (usize, usize, f64) {
        let field = self.world.field();
        (field.cols(), field.rows(), field.cell_size())
    }

    /// `(x, y, heading, carrying)` per ant.
    fn ants(&self) -> Vec<(f64, f64, f64, bool)> {
        self.world
            .ants()
            .iter()
            .map(|a| (a.position[0], a.position[1], a.heading, a.carrying))
            .collect()
    }

    /// `(x, y, remaining, capacity)` per food source.
    fn foods(&self) -> Vec<(f64, f64, u32, u32)> {
        self.world
            .food()
            .iter()
            .map(|f| (f.position[0], f.position[1], f.remaining, f.capacity))
            .collect()
    }

    /// `(x, y, capture_radius)`.
    fn nest(&self) -> (f64, f64, f64) {
        let nest = self.world.nest();
        (nest.position[0], nest.position[1], nest.capture_radius)
    }

    fn metrics_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.world.collect_step_metrics())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    m.add_class::<PyColony>()?;
    Ok(())
}
