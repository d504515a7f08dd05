use super::World;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub field_us: u64,
    pub ants_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub ant_count: usize,
    pub carrying_count: usize,
    pub pickups: usize,
    pub deliveries: usize,
    pub total_pickups: u64,
    pub total_deliveries: u64,
    pub food_sources: usize,
    pub food_remaining: u64,
    pub field_total: f64,
    pub field_max: f32,
    /// Mean toroidal distance of ants from the nest.
    pub mean_nest_distance: f64,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    /// Pickups and deliveries during this run only.
    #[serde(default)]
    pub pickups: u64,
    #[serde(default)]
    pub deliveries: u64,
    #[serde(default)]
    pub final_food_remaining: u64,
}

impl World {
    pub fn collect_step_metrics(&self) -> StepMetrics {
        StepMetrics {
            step: self.step_index,
            ant_count: self.ants.len(),
            carrying_count: self.ants.iter().filter(|a| a.carrying).count(),
            pickups: self.pickups_last_step,
            deliveries: self.deliveries_last_step,
            total_pickups: self.total_pickups,
            total_deliveries: self.total_deliveries,
            food_sources: self.food.len(),
            food_remaining: self.food.remaining_total(),
            field_total: self.field.total(),
            field_max: self.field.max_value(),
            mean_nest_distance: self.mean_nest_distance(),
        }
    }

    /// Ants wrap around the edges, so distance is measured on the torus.
    fn mean_nest_distance(&self) -> f64 {
        if self.ants.is_empty() {
            return 0.0;
        }
        let (width, height) = (self.config.width, self.config.height);
        let nest = self.nest.position;
        let sum: f64 = self
            .ants
            .iter()
            .map(|a| {
                let mut dx = (a.position[0] - nest[0]).abs();
                if dx > width * 0.5 {
                    dx = width - dx;
                }
                let mut dy = (a.position[1] - nest[1]).abs();
                if dy > height * 0.5 {
                    dy = height - dy;
                }
                dx.hypot(dy)
            })
            .sum();
        sum / self.ants.len() as f64
    }
}
