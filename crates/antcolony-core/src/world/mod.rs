pub mod lifecycle;
pub mod metrics;
pub mod snapshot;

pub use metrics::*;
pub use snapshot::*;

use crate::agent::Ant;
use crate::config::{self, SimConfig, SimConfigError};
use crate::field::PheromoneField;
use crate::resource::{FoodSource, FoodSources, Nest, REMOVE_TOLERANCE_MARGIN};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use thiserror::Error;
use tracing::{debug, warn};

/// One colony: pheromone field, ant population, food and nest.
///
/// The host owns a single `World` per view and drives it with [`World::step`];
/// renderers only ever see a [`Snapshot`].
pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) field: PheromoneField,
    pub(crate) ants: Vec<Ant>,
    pub(crate) food: FoodSources,
    pub(crate) nest: Nest,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) step_index: usize,
    pub(crate) pickups_last_step: usize,
    pub(crate) deliveries_last_step: usize,
    pub(crate) total_pickups: u64,
    pub(crate) total_deliveries: u64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] SimConfigError),
    #[error("viewport {width}x{height} must be finite and positive")]
    InvalidViewport { width: f64, height: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    #[error("sample_every must be positive")]
    InvalidSampleEvery,
    #[error("steps ({actual}) exceed supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;

    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Build a world with default food and `config.ant_count` ants at the nest.
    pub fn try_new(config: SimConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let field = PheromoneField::new(config.width, config.height, config.cell_size);
        let nest = Nest::centered(config.width, config.height, config.nest_radius);
        let mut food = FoodSources::new();
        food.seed_default(config.width, config.height, config.food_layout);

        let mut world = Self {
            rng: ChaCha12Rng::seed_from_u64(config.seed),
            field,
            ants: Vec::new(),
            food,
            nest,
            step_index: 0,
            pickups_last_step: 0,
            deliveries_last_step: 0,
            total_pickups: 0,
            total_deliveries: 0,
            config,
        };
        world.reset_ants(world.config.ant_count);
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Swap in a new configuration between steps.
    ///
    /// Invalid configs are rejected and leave the world untouched. A new viewport
    /// or cell size reallocates the field; a new viewport also respawns the ants.
    /// `ant_count` otherwise waits for the next reset.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), WorldError> {
        config.validate()?;
        let viewport_changed = (self.config.width - config.width).abs() > f64::EPSILON
            || (self.config.height - config.height).abs() > f64::EPSILON;
        let cell_changed = (self.config.cell_size - config.cell_size).abs() > f64::EPSILON;
        let seed_changed = self.config.seed != config.seed;
        self.config = config;

        if seed_changed {
            self.rng = ChaCha12Rng::seed_from_u64(self.config.seed);
        }
        if viewport_changed || cell_changed {
            self.field =
                PheromoneField::new(self.config.width, self.config.height, self.config.cell_size);
        }
        self.nest = Nest::centered(self.config.width, self.config.height, self.config.nest_radius);
        if viewport_changed {
            self.reset_ants(self.config.ant_count);
        }
        debug!(
            viewport_changed,
            cell_changed, seed_changed, "applied simulation config"
        );
        Ok(())
    }

    /// Adopt a new viewport: fresh zeroed field, recentred nest, respawned ants.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), WorldError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidViewport { width, height });
        }
        config::check_field_size(width, height, self.config.cell_size)?;

        self.config.width = width;
        self.config.height = height;
        self.field.resize(width, height);
        self.nest = Nest::centered(width, height, self.config.nest_radius);
        debug!(
            width,
            height,
            cols = self.field.cols(),
            rows = self.field.rows(),
            "resized world"
        );
        self.reset_ants(self.config.ant_count);
        Ok(())
    }

    /// Replace the population with `count` fresh ants at the nest.
    pub fn reset_ants(&mut self, count: usize) {
        let count = if count > SimConfig::MAX_ANTS {
            warn!(
                requested = count,
                max = SimConfig::MAX_ANTS,
                "clamping ant population"
            );
            SimConfig::MAX_ANTS
        } else {
            count
        };
        let nest = self.nest.position;
        let rng = &mut self.rng;
        self.ants = (0..count).map(|_| Ant::spawn(nest, &mut *rng)).collect();
        debug!(count, "spawned ants");
    }

    /// Default food, empty trails, counters zeroed and `ant_count` fresh ants.
    pub fn restart(&mut self) {
        self.food.clear();
        self.food
            .seed_default(self.config.width, self.config.height, self.config.food_layout);
        self.field.clear();
        self.step_index = 0;
        self.pickups_last_step = 0;
        self.deliveries_last_step = 0;
        self.total_pickups = 0;
        self.total_deliveries = 0;
        self.reset_ants(self.config.ant_count);
        debug!("restarted colony");
    }

    pub fn add_food_at(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            warn!(x, y, "ignoring food placement at non-finite coordinates");
            return;
        }
        self.food.add_at(x, y);
    }

    /// Remove the first food source within `food_radius + 4` of the point.
    pub fn remove_food_at(&mut self, x: f64, y: f64) -> Option<FoodSource> {
        if !(x.is_finite() && y.is_finite()) {
            warn!(x, y, "ignoring food removal at non-finite coordinates");
            return None;
        }
        self.food
            .remove_near(x, y, self.config.food_radius + REMOVE_TOLERANCE_MARGIN)
    }

    pub fn clear_food(&mut self) {
        self.food.clear();
    }

    pub fn seed_default_food(&mut self) {
        self.food
            .seed_default(self.config.width, self.config.height, self.config.food_layout);
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn height(&self) -> f64 {
        self.config.height
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn food(&self) -> &[FoodSource] {
        self.food.as_slice()
    }

    pub fn nest(&self) -> Nest {
        self.nest
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn total_pickups(&self) -> u64 {
        self.total_pickups
    }

    pub fn total_deliveries(&self) -> u64 {
        self.total_deliveries
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Step `steps` times, sampling metrics every `sample_every` steps and on the last step.
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };

        let pickups_before = self.total_pickups;
        let deliveries_before = self.total_deliveries;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            samples,
            pickups: self.total_pickups - pickups_before,
            deliveries: self.total_deliveries - deliveries_before,
            final_food_remaining: self.food.remaining_total(),
        })
    }
}
