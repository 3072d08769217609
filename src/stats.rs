// --- File: stats.rs ---
use crate::grid::{Grid, Lineage};
use rayon::prelude::*;
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::time::Duration;

/// Counts derived from one grid snapshot by a full scan. Not part of the
/// engine contract; the display layer computes these after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub generation: u64,
    pub living: usize,
    pub mutated: usize,
    pub normal: usize,
}

impl GenerationStats {
    pub fn from_grid(generation: u64, grid: &Grid) -> Self {
        let (living, mutated) = grid
            .cells()
            .par_iter()
            .map(|cell| {
                if !cell.is_alive {
                    (0usize, 0usize)
                } else if cell.lineage == Lineage::Mutated {
                    (1, 1)
                } else {
                    (1, 0)
                }
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));
        Self {
            generation,
            living,
            mutated,
            normal: living - mutated,
        }
    }
}

/// Rolling window of per-generation samples, oldest evicted first.
pub struct GrowthHistory {
    samples: VecDeque<GenerationStats>,
    capacity: usize,
}

impl GrowthHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: GenerationStats) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> Option<&GenerationStats> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationStats> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Plain-text dump of the window, newest last.
    pub fn table(&self) -> String {
        let mut out = String::from("generation   living   normal   mutated\n");
        for sample in &self.samples {
            let _ = writeln!(
                out,
                "{:>10}   {:>6}   {:>6}   {:>7}",
                sample.generation, sample.living, sample.normal, sample.mutated
            );
        }
        out
    }
}

/// Rolling window of engine call durations for the status line.
pub struct TickTimings {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl TickTimings {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(elapsed);
    }

    pub fn average(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

// --- End of File: stats.rs ---
