//! Stigmergic ant-colony simulation: a pheromone grid, food sources, a nest and a
//! fixed population of ants that search, pick up food and home back to the nest.

pub mod agent;
pub mod config;
pub mod field;
pub mod resource;
pub mod world;

pub use agent::{Ant, AntState};
pub use config::{SimConfig, SimConfigError};
pub use field::PheromoneField;
pub use resource::{FoodLayout, FoodSource, FoodSources, Nest};
pub use world::{
    ExperimentError, RunSummary, Snapshot, StepMetrics, StepTimings, Surface, World, WorldError,
};
