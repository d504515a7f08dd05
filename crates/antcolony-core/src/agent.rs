use crate::field::PheromoneField;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Heading change selected by the weighted left/forward/right draw.
pub const TURN_STEP: f64 = 0.25;
/// Keeps every sensor weight positive so an empty field yields an unbiased walk.
pub const SENSOR_EPSILON: f32 = 1e-6;
/// Full width of the uniform heading noise while searching.
pub const SEARCH_JITTER: f64 = 0.2;
/// Full width of the uniform heading noise while homing.
pub const RETURN_JITTER: f64 = 0.05;
/// Full width of the square around the nest that ants spawn in.
pub const SPAWN_JITTER: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AntState {
    Searching,
    Returning,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ant {
    pub position: [f64; 2],
    /// Radians; not normalised.
    pub heading: f64,
    pub carrying: bool,
}

/// Field readings at the three probe points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sensors {
    pub left: f32,
    pub forward: f32,
    pub right: f32,
}

impl Ant {
    pub fn new(position: [f64; 2], heading: f64) -> Self {
        Self {
            position,
            heading,
            carrying: false,
        }
    }

    /// Fresh searching ant near `nest` with a uniformly random heading.
    pub fn spawn(nest: [f64; 2], rng: &mut impl Rng) -> Self {
        let half = SPAWN_JITTER / 2.0;
        let position = [
            nest[0] + rng.random_range(-half..half),
            nest[1] + rng.random_range(-half..half),
        ];
        Self::new(position, rng.random_range(0.0..TAU))
    }

    pub fn state(&self) -> AntState {
        if self.carrying {
            AntState::Returning
        } else {
            AntState::Searching
        }
    }

    pub fn sense(&self, field: &PheromoneField, offset: f64, angle: f64) -> Sensors {
        let probe = |heading: f64| {
            field.sample(
                self.position[0] + heading.cos() * offset,
                self.position[1] + heading.sin() * offset,
            )
        };
        Sensors {
            left: probe(self.heading - angle),
            forward: probe(self.heading),
            right: probe(self.heading + angle),
        }
    }

    /// Advance `speed` along the heading and wrap into `[0, width) × [0, height)`.
    pub fn advance(&mut self, speed: f64, width: f64, height: f64) {
        self.position[0] = wrap_coord(self.position[0] + self.heading.cos() * speed, width);
        self.position[1] = wrap_coord(self.position[1] + self.heading.sin() * speed, height);
    }
}

/// Pick `-TURN_STEP`, `0` or `+TURN_STEP` with probability proportional to the
/// left/forward/right readings. `draw` is uniform in `[0, 1)`.
pub fn choose_turn(sensors: Sensors, draw: f32) -> f64 {
    let l = sensors.left + SENSOR_EPSILON;
    let f = sensors.forward + SENSOR_EPSILON;
    let r = sensors.right + SENSOR_EPSILON;
    let pick = draw * (l + f + r);
    if pick < l {
        -TURN_STEP
    } else if pick < l + f {
        0.0
    } else {
        TURN_STEP
    }
}

/// Map an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Toroidal wrap into `[0, extent)`.
pub fn wrap_coord(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn spawn_stays_near_nest_and_searches() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        for _ in 0..200 {
            let ant = Ant::spawn([50.0, 40.0], &mut rng);
            assert!((ant.position[0] - 50.0).abs() <= 2.0);
            assert!((ant.position[1] - 40.0).abs() <= 2.0);
            assert!((0.0..TAU).contains(&ant.heading));
            assert_eq!(ant.state(), AntState::Searching);
        }
    }

    #[test]
    fn empty_field_turns_are_evenly_split() {
        let sensors = Sensors::default();
        assert_eq!(choose_turn(sensors, 0.0), -TURN_STEP);
        assert_eq!(choose_turn(sensors, 0.5), 0.0);
        assert_eq!(choose_turn(sensors, 0.9), TURN_STEP);
    }

    #[test]
    fn strong_side_dominates_turn() {
        let sensors = Sensors {
            left: 0.0,
            forward: 0.0,
            right: 10.0,
        };
        for draw in [0.001f32, 0.25, 0.5, 0.999] {
            assert_eq!(choose_turn(sensors, draw), TURN_STEP);
        }
        let sensors = Sensors {
            left: 10.0,
            forward: 0.0,
            right: 0.0,
        };
        assert_eq!(choose_turn(sensors, 0.99), -TURN_STEP);
    }

    #[test]
    fn sense_probes_along_heading() {
        let mut field = PheromoneField::new(40.0, 40.0, 1.0);
        field.deposit(30.0, 20.0, 1.0);
        field.deposit(20.0, 30.0, 2.0);
        field.deposit(20.0, 10.0, 3.0);
        let ant = Ant::new([20.5, 20.5], 0.0);
        let sensors = ant.sense(&field, 10.0, PI / 2.0);
        assert_eq!(sensors.forward, 1.0);
        assert_eq!(sensors.right, 2.0);
        assert_eq!(sensors.left, 3.0);
    }

    #[test]
    fn advance_wraps_toroidally() {
        let mut ant = Ant::new([99.5, 0.5], 0.0);
        ant.advance(1.0, 100.0, 50.0);
        assert!((ant.position[0] - 0.5).abs() < 1e-9);

        let mut ant = Ant::new([10.0, 0.5], -PI / 2.0);
        ant.advance(1.0, 100.0, 50.0);
        assert!((ant.position[1] - 49.5).abs() < 1e-9);
        assert!((ant.position[0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_coord_never_returns_extent() {
        assert_eq!(wrap_coord(-1e-18, 100.0), 0.0);
        assert_eq!(wrap_coord(100.0, 100.0), 0.0);
        assert!((wrap_coord(-3.0, 100.0) - 97.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_angle_normalises() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI / 2.0 - TAU) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-12);
        assert!(wrap_angle(-PI) > 0.0);
    }
}
