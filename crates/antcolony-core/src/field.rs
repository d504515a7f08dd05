use crate::config::SimConfig;

/// 2D pheromone grid over the viewport.
/// Each cell holds a non-negative trail intensity; the grid does not wrap.

#[derive(Clone, Debug)]
pub struct PheromoneField {
    cols: usize,
    rows: usize,
    cell_size: f64,
    data: Vec<f32>,
    // Holds the pre-diffusion snapshot so `diffuse` reads only old values.
    scratch: Vec<f32>,
}

impl PheromoneField {
    pub fn new(width: f64, height: f64, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        let (cols, rows) = SimConfig::grid_dims(width, height, cell_size);
        let len = cols * rows;
        Self {
            cols,
            rows,
            cell_size,
            data: vec![0.0; len],
            scratch: vec![0.0; len],
        }
    }

    /// Reallocate a zeroed grid for a new viewport. Prior trails are dropped, not resampled.
    pub fn resize(&mut self, width: f64, height: f64) {
        *self = Self::new(width, height, self.cell_size);
    }

    /// Add `amount` to the cell under `(x, y)`. Points off the grid are ignored.
    pub fn deposit(&mut self, x: f64, y: f64, amount: f32) {
        if let Some(idx) = self.cell_index(x, y) {
            self.data[idx] += amount;
        }
    }

    /// Trail intensity under `(x, y)`, or 0 off the grid.
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        self.cell_index(x, y).map_or(0.0, |idx| self.data[idx])
    }

    /// Multiply every cell by `1 - rate`.
    pub fn evaporate(&mut self, rate: f32) {
        debug_assert!((0.0..1.0).contains(&rate), "evaporation rate outside [0, 1)");
        let keep = 1.0 - rate;
        for cell in &mut self.data {
            *cell *= keep;
        }
    }

    /// Blend each interior cell toward the mean of its four orthogonal neighbours.
    ///
    /// The outer ring of cells is left as-is; trails are not smoothed across the
    /// viewport edge.
    pub fn diffuse(&mut self, alpha: f32) {
        if alpha <= 0.0 || self.cols < 3 || self.rows < 3 {
            return;
        }
        self.scratch.copy_from_slice(&self.data);
        let cols = self.cols;
        let old = &self.scratch;
        for y in 1..self.rows - 1 {
            for x in 1..cols - 1 {
                let i = y * cols + x;
                let neighbors = old[i - 1] + old[i + 1] + old[i - cols] + old[i + cols];
                self.data[i] = (1.0 - alpha) * old[i] + alpha * (neighbors * 0.25);
            }
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Row-major cell values, `rows * cols` long.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at grid coordinates, `None` off the grid.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        (col < self.cols && row < self.rows).then(|| self.data[row * self.cols + col])
    }

    pub fn total(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Largest cell value; renderers normalise intensities against it.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0f32, f32::max)
    }

    fn cell_index(&self, x: f64, y: f64) -> Option<usize> {
        let gx = (x / self.cell_size).floor();
        let gy = (y / self.cell_size).floor();
        // NaN fails both comparisons and lands here too.
        if !(gx >= 0.0 && gy >= 0.0) || gx >= self.cols as f64 || gy >= self.rows as f64 {
            return None;
        }
        Some(gy as usize * self.cols + gx as usize)
    }
}
