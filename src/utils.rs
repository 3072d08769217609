use glam::Vec2;
use winit::dpi::PhysicalSize;

// --- Helper Types ---

/// Screen-space placement of the dish: square cells, letterboxed and
/// centered. The renderer and cursor picking share this math so clicks
/// always land on the drawn cell.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    cell_size: f32,
    origin: Vec2,
    rows: usize,
    cols: usize,
}

impl GridLayout {
    pub fn new(window: PhysicalSize<u32>, rows: usize, cols: usize) -> Self {
        let width = window.width.max(1) as f32;
        let height = window.height.max(1) as f32;
        let cell_size = (width / cols.max(1) as f32).min(height / rows.max(1) as f32);
        let origin = Vec2::new(
            (width - cell_size * cols as f32) * 0.5,
            (height - cell_size * rows as f32) * 0.5,
        );
        Self {
            cell_size,
            origin,
            rows,
            cols,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel-space center of a cell quad.
    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        self.origin
            + Vec2::new(
                (col as f32 + 0.5) * self.cell_size,
                (row as f32 + 0.5) * self.cell_size,
            )
    }

    /// Inverse of `cell_center`: the cell under a cursor position, or
    /// `None` when the cursor sits in the letterbox margin.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let local = Vec2::new(x as f32, y as f32) - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let col = (local.x / self.cell_size) as usize;
        let row = (local.y / self.cell_size) as usize;
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some((row, col))
    }
}
