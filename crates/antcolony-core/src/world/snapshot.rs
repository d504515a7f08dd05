use super::World;
use crate::agent::Ant;
use crate::field::PheromoneField;
use crate::resource::{FoodSource, Nest};

/// Read-only view of a world between steps.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub step: usize,
    pub width: f64,
    pub height: f64,
    pub field: &'a PheromoneField,
    pub ants: &'a [Ant],
    pub food: &'a [FoodSource],
    pub nest: Nest,
    pub show_field: bool,
    pub show_agents: bool,
}

/// Anything that paints a [`Snapshot`]: a canvas bridge, a terminal, a test recorder.
pub trait Surface {
    fn draw(&mut self, snapshot: &Snapshot<'_>);
}

impl World {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            step: self.step_index,
            width: self.config.width,
            height: self.config.height,
            field: &self.field,
            ants: &self.ants,
            food: self.food.as_slice(),
            nest: self.nest,
            show_field: self.config.show_field,
            show_agents: self.config.show_agents,
        }
    }

    /// Hand the current state to `surface`. Never mutates the simulation.
    pub fn draw(&self, surface: &mut impl Surface) {
        surface.draw(&self.snapshot());
    }
}
