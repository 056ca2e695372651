use macroquad::prelude::*;

/// Uniform grid over obstacle bounds. Each cell lists the indices of every
/// obstacle whose bounds touch it, in insertion order.
///
/// Cell coordinates are clamped to the grid, so geometry outside the arena
/// still lands in an edge cell and queries stay exact.
pub struct SpatialHash {
    inv_cell_size: f32,
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Vec<u32>>,
}

impl SpatialHash {
    pub fn new(world_w: f32, world_h: f32, cell_size: f32) -> Self {
        let cols = ((world_w / cell_size).ceil() as usize).max(1);
        let rows = ((world_h / cell_size).ceil() as usize).max(1);
        let cells = (0..cols * rows).map(|_| Vec::with_capacity(4)).collect();
        Self {
            inv_cell_size: 1.0 / cell_size,
            cols,
            rows,
            cells,
        }
    }

    /// Register obstacle `idx` in every cell its bounds cover. Indices must be
    /// inserted in increasing order for the per-cell lists to stay sorted.
    pub fn insert(&mut self, idx: u32, bounds: &Rect) {
        let (x0, x1, y0, y1) = self.cell_span(bounds);
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                self.cells[cy * self.cols + cx].push(idx);
            }
        }
    }

    /// Obstacle indices that may contain `pos`, lowest first.
    pub fn candidates_at(&self, pos: Vec2) -> &[u32] {
        let cx = self.clamp_col(pos.x);
        let cy = self.clamp_row(pos.y);
        &self.cells[cy * self.cols + cx]
    }

    /// Every cell list that `rect` covers. An index can appear in several.
    pub fn cells_covering<'a>(&'a self, rect: &Rect) -> impl Iterator<Item = &'a [u32]> + 'a {
        let (x0, x1, y0, y1) = self.cell_span(rect);
        (y0..=y1).flat_map(move |cy| {
            (x0..=x1).map(move |cx| self.cells[cy * self.cols + cx].as_slice())
        })
    }

    fn cell_span(&self, rect: &Rect) -> (usize, usize, usize, usize) {
        (
            self.clamp_col(rect.x),
            self.clamp_col(rect.x + rect.w),
            self.clamp_row(rect.y),
            self.clamp_row(rect.y + rect.h),
        )
    }

    fn clamp_col(&self, x: f32) -> usize {
        clamp_cell(x * self.inv_cell_size, self.cols)
    }

    fn clamp_row(&self, y: f32) -> usize {
        clamp_cell(y * self.inv_cell_size, self.rows)
    }
}

fn clamp_cell(scaled: f32, count: usize) -> usize {
    if scaled <= 0.0 {
        0
    } else {
        (scaled.floor() as usize).min(count - 1)
    }
}
