use super::metrics::StepTimings;
use super::World;
use crate::agent::{choose_turn, wrap_angle, Ant, AntState, RETURN_JITTER, SEARCH_JITTER};
use crate::config::SimConfig;
use crate::field::PheromoneField;
use crate::resource::{FoodSources, Nest};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;

/// What an ant did to the colony's shared state this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AntEvent {
    None,
    PickedUp,
    Delivered,
}

/// Sense, turn, deposit and check for pickup or delivery. Does not move the ant.
pub(crate) fn decide(
    ant: &mut Ant,
    config: &SimConfig,
    nest: &Nest,
    field: &mut PheromoneField,
    food: &mut FoodSources,
    rng: &mut ChaCha12Rng,
) -> AntEvent {
    let [x, y] = ant.position;
    let max_turn = config.max_turn_angle;
    match ant.state() {
        AntState::Searching => {
            let sensors = ant.sense(field, config.sensor_offset, config.sensor_angle);
            let turn = choose_turn(sensors, rng.random::<f32>());
            let jitter = rng.random_range(-0.5..0.5) * SEARCH_JITTER;
            ant.heading += (turn + jitter).clamp(-max_turn, max_turn);

            field.deposit(x, y, config.deposit_searching);

            if food.take_nearest(x, y, config.food_radius) {
                ant.carrying = true;
                return AntEvent::PickedUp;
            }
            AntEvent::None
        }
        AntState::Returning => {
            let bearing = (nest.position[1] - y).atan2(nest.position[0] - x);
            let diff = wrap_angle(bearing - ant.heading);
            let jitter = rng.random_range(-0.5..0.5) * RETURN_JITTER;
            ant.heading += diff.clamp(-max_turn, max_turn) + jitter;

            field.deposit(x, y, config.deposit_carrying);

            if nest.contains(ant.position) {
                ant.carrying = false;
                return AntEvent::Delivered;
            }
            AntEvent::None
        }
    }
}

impl World {
    /// Evaporate, then diffuse. Deposits from the previous tick decay here first.
    fn step_field_phase(&mut self) {
        self.field.evaporate(self.config.evaporation_rate);
        self.field.diffuse(self.config.diffusion_alpha);
    }

    /// Update every ant in population order, then move it with toroidal wrap.
    fn step_ant_phase(&mut self) {
        let config = &self.config;
        let nest = &self.nest;
        let field = &mut self.field;
        let food = &mut self.food;
        let rng = &mut self.rng;
        let mut pickups = 0;
        let mut deliveries = 0;

        for ant in &mut self.ants {
            match decide(ant, config, nest, field, food, rng) {
                AntEvent::PickedUp => pickups += 1,
                AntEvent::Delivered => deliveries += 1,
                AntEvent::None => {}
            }
            ant.advance(config.ant_speed, config.width, config.height);
        }

        self.pickups_last_step = pickups;
        self.deliveries_last_step = deliveries;
        self.total_pickups += pickups as u64;
        self.total_deliveries += deliveries as u64;
    }

    /// Advance one tick: the whole field first, then every ant.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        self.step_index = self.step_index.saturating_add(1);

        let t0 = Instant::now();
        self.step_field_phase();
        let field_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_ant_phase();
        let ants_us = t1.elapsed().as_micros() as u64;

        StepTimings {
            field_us,
            ants_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }
}
