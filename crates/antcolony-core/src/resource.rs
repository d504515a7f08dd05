//! Food sources and the nest.
use serde::{Deserialize, Serialize};

/// Amount given to a source placed by the user.
pub const DEFAULT_FOOD_AMOUNT: u32 = 200;
/// Extra slack around `food_radius` when picking a source to remove.
pub const REMOVE_TOLERANCE_MARGIN: f64 = 4.0;
/// Extra slack around `nest_radius` within which a returning ant delivers.
pub const NEST_CAPTURE_MARGIN: f64 = 2.0;

/// Placement of the three starting food sources, scaled to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodLayout {
    /// Spread for a landscape canvas.
    #[default]
    Wide,
    /// Pulled slightly inwards for a narrow portrait canvas.
    Compact,
}

impl FoodLayout {
    /// `(fraction of width, fraction of height, amount)` per source.
    fn anchors(self) -> [(f64, f64, u32); 3] {
        match self {
            FoodLayout::Wide => [(0.18, 0.2, 220), (0.85, 0.3, 200), (0.25, 0.78, 240)],
            FoodLayout::Compact => [(0.2, 0.22, 220), (0.82, 0.28, 200), (0.28, 0.76, 240)],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodSource {
    pub position: [f64; 2],
    pub remaining: u32,
    /// Amount the source was created with.
    pub capacity: u32,
}

impl FoodSource {
    pub fn new(position: [f64; 2], amount: u32) -> Self {
        Self {
            position,
            remaining: amount,
            capacity: amount,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.position[0] - x).hypot(self.position[1] - y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nest {
    pub position: [f64; 2],
    pub capture_radius: f64,
}

impl Nest {
    /// Nest at the centre of a `width × height` viewport.
    pub fn centered(width: f64, height: f64, nest_radius: f64) -> Self {
        Self {
            position: [width / 2.0, height / 2.0],
            capture_radius: nest_radius + NEST_CAPTURE_MARGIN,
        }
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        (point[0] - self.position[0]).hypot(point[1] - self.position[1]) <= self.capture_radius
    }
}

/// Ordered set of food sources. Order decides removal and nearest-food ties.
#[derive(Clone, Debug, Default)]
pub struct FoodSources {
    sources: Vec<FoodSource>,
}

impl FoodSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, x: f64, y: f64, amount: u32) {
        self.sources.push(FoodSource::new([x, y], amount));
    }

    pub fn add_at(&mut self, x: f64, y: f64) {
        self.add(x, y, DEFAULT_FOOD_AMOUNT);
    }

    /// Remove the first source within `tolerance` of `(x, y)`.
    pub fn remove_near(&mut self, x: f64, y: f64, tolerance: f64) -> Option<FoodSource> {
        let idx = self
            .sources
            .iter()
            .position(|f| f.distance_to(x, y) <= tolerance)?;
        Some(self.sources.remove(idx))
    }

    /// Index of the closest non-empty source strictly within `radius`; earliest wins ties.
    pub fn nearest_with_food(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        let mut best = None;
        let mut best_d = f64::INFINITY;
        for (idx, f) in self.sources.iter().enumerate() {
            if f.is_exhausted() {
                continue;
            }
            let d = f.distance_to(x, y);
            if d < radius && d < best_d {
                best = Some(idx);
                best_d = d;
            }
        }
        best
    }

    /// Take one unit from the closest reachable source. Returns whether anything was taken.
    pub fn take_nearest(&mut self, x: f64, y: f64, radius: f64) -> bool {
        match self.nearest_with_food(x, y, radius) {
            Some(idx) => {
                self.sources[idx].remaining -= 1;
                true
            }
            None => false,
        }
    }

    /// Replace the set with the three-source `layout` scaled to a viewport.
    pub fn seed_default(&mut self, width: f64, height: f64, layout: FoodLayout) {
        self.sources.clear();
        for (fx, fy, amount) in layout.anchors() {
            self.add(width * fx, height * fy, amount);
        }
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }

    pub fn as_slice(&self) -> &[FoodSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn remaining_total(&self) -> u64 {
        self.sources.iter().map(|f| f.remaining as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_at_uses_default_amount() {
        let mut food = FoodSources::new();
        food.add_at(3.0, 4.0);
        assert_eq!(food.len(), 1);
        assert_eq!(food.as_slice()[0].remaining, DEFAULT_FOOD_AMOUNT);
        assert_eq!(food.as_slice()[0].capacity, DEFAULT_FOOD_AMOUNT);
    }

    #[test]
    fn remove_takes_first_match_not_closest() {
        let mut food = FoodSources::new();
        food.add(10.0, 0.0, 5);
        food.add(1.0, 0.0, 6);
        let removed = food.remove_near(0.0, 0.0, 12.0).expect("a source in range");
        assert_eq!(removed.remaining, 5);
        assert_eq!(food.len(), 1);
        assert_eq!(food.as_slice()[0].position, [1.0, 0.0]);
    }

    #[test]
    fn remove_outside_tolerance_is_noop() {
        let mut food = FoodSources::new();
        food.add(50.0, 50.0, 5);
        assert!(food.remove_near(0.0, 0.0, 14.0).is_none());
        assert_eq!(food.len(), 1);
    }

    #[test]
    fn nearest_prefers_closest_then_earliest() {
        let mut food = FoodSources::new();
        food.add(6.0, 0.0, 1);
        food.add(3.0, 0.0, 1);
        food.add(0.0, 3.0, 1);
        assert_eq!(food.nearest_with_food(0.0, 0.0, 10.0), Some(1));

        food.clear();
        food.add(0.0, 2.0, 1);
        food.add(2.0, 0.0, 1);
        assert_eq!(food.nearest_with_food(0.0, 0.0, 10.0), Some(0));
    }

    #[test]
    fn nearest_skips_exhausted_and_out_of_range() {
        let mut food = FoodSources::new();
        food.add(1.0, 0.0, 0);
        food.add(10.0, 0.0, 3);
        food.add(4.0, 0.0, 3);
        assert_eq!(food.nearest_with_food(0.0, 0.0, 5.0), Some(2));
        assert_eq!(food.nearest_with_food(0.0, 0.0, 4.0), None);
    }

    #[test]
    fn take_nearest_decrements_by_one_and_keeps_empty_sources() {
        let mut food = FoodSources::new();
        food.add(0.0, 0.0, 2);
        assert!(food.take_nearest(0.0, 0.0, 1.0));
        assert!(food.take_nearest(0.0, 0.0, 1.0));
        assert!(!food.take_nearest(0.0, 0.0, 1.0));
        assert_eq!(food.len(), 1);
        assert!(food.as_slice()[0].is_exhausted());
        assert_eq!(food.as_slice()[0].capacity, 2);
        assert_eq!(food.remaining_total(), 0);
    }

    #[test]
    fn seed_default_replaces_with_layout() {
        let mut food = FoodSources::new();
        food.add_at(1.0, 1.0);
        food.seed_default(100.0, 50.0, FoodLayout::Wide);
        let positions: Vec<[f64; 2]> = food.as_slice().iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![[18.0, 10.0], [85.0, 15.0], [25.0, 39.0]]);
        assert_eq!(food.remaining_total(), 660);
    }

    #[test]
    fn compact_layout_pulls_sources_inwards() {
        let mut food = FoodSources::new();
        food.seed_default(100.0, 50.0, FoodLayout::Compact);
        let expected = [[20.0, 11.0], [82.0, 14.0], [28.0, 38.0]];
        for (source, want) in food.as_slice().iter().zip(expected) {
            assert!((source.position[0] - want[0]).abs() < 1e-9);
            assert!((source.position[1] - want[1]).abs() < 1e-9);
        }
        assert_eq!(food.len(), 3);
        assert_eq!(food.remaining_total(), 660);
    }

    #[test]
    fn nest_capture_includes_margin() {
        let nest = Nest::centered(200.0, 150.0, 10.0);
        assert_eq!(nest.position, [100.0, 75.0]);
        assert!(nest.contains([112.0, 75.0]));
        assert!(!nest.contains([112.5, 75.0]));
    }
}
