// --- File: constants.rs ---
// --- Global Simulation Constants ---
use glam::Vec4;

pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.015,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

pub const GRID_ROWS: usize = 100;
pub const GRID_COLS: usize = 100;
// 2% of slots start alive on the default dish; small demo grids want more.
pub const INITIAL_LIVE_PROBABILITY: f32 = 0.02;
pub const DEFAULT_MUTATION_RATE: f32 = 0.1;
pub const DEFAULT_LIFESPAN: u32 = 6;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
// Ticks faster than this are rejected at config validation, not clamped.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;
pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;
pub const TICK_INTERVAL_STEP_MS: u64 = 100;

// Offspring of a mutation event carry the boosted rate, capped at 1.0.
pub const MUTATION_RATE_BOOST: f32 = 1.5;

pub const WINDOW_WIDTH: u32 = 900;
pub const WINDOW_HEIGHT: u32 = 900;
pub const FPS_UPDATE_INTERVAL_SECS: f64 = 0.5;

pub const HISTORY_CAPACITY: usize = 100;
pub const TIMING_WINDOW: usize = 60;

// Cell quads are inset slightly so the lattice reads as discrete slots.
pub const CELL_FILL_FACTOR: f32 = 0.9;

pub const NORMAL_CELL_COLOR: Vec4 = Vec4::new(0.18, 0.74, 0.25, 1.0); // founding lineage
pub const MUTATED_CELL_COLOR: Vec4 = Vec4::new(0.95, 0.55, 0.1, 1.0); // mutated lineage
pub const DEAD_CELL_COLOR: Vec4 = Vec4::new(0.10, 0.11, 0.13, 1.0);

// --- End of File: constants.rs ---
