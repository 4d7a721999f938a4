//! Parallel batches of independent playouts.
//!
//! Every rayon worker keeps one [`Simulation`] and refills it from the
//! template before each playout, so nothing is shared between threads
//! except the read-only template.

use log::debug;
use rayon::prelude::*;

use crate::board::Color;
use crate::playout::{PlayoutResult, PlayoutState};
use crate::simulation::Simulation;

/// Aggregated outcome of many playouts. Scores are from Black's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatchStats {
    pub playouts: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub score_sum: f64,
    pub double_pass: usize,
    pub mercy: usize,
    pub length_cap: usize,
}

impl BatchStats {
    pub fn record(&mut self, result: &PlayoutResult) {
        self.playouts += 1;
        match result.winner {
            Some(Color::Black) => self.black_wins += 1,
            Some(Color::White) => self.white_wins += 1,
            None => {}
        }
        self.score_sum += result.score;
        match result.state {
            PlayoutState::DoublePass => self.double_pass += 1,
            PlayoutState::Mercy => self.mercy += 1,
            PlayoutState::LengthCap => self.length_cap += 1,
            PlayoutState::Running => {}
        }
    }

    pub fn merge(mut self, other: BatchStats) -> BatchStats {
        self.playouts += other.playouts;
        self.black_wins += other.black_wins;
        self.white_wins += other.white_wins;
        self.score_sum += other.score_sum;
        self.double_pass += other.double_pass;
        self.mercy += other.mercy;
        self.length_cap += other.length_cap;
        self
    }

    pub fn mean_score(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.score_sum / self.playouts as f64
        }
    }

    pub fn black_win_rate(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.black_wins as f64 / self.playouts as f64
        }
    }
}

/// Seed of playout `index` in a batch started from `seed`.
fn playout_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Run `count` playouts from `template` on the current rayon pool.
///
/// Playout `i` is seeded from the template's seed and `i` alone, so the
/// result does not depend on the number of threads.
pub fn run_parallel(template: &Simulation, count: usize) -> BatchStats {
    let seed = template.config().seed;
    let stats = (0..count)
        .into_par_iter()
        .map_init(
            || template.clone(),
            |sim, i| {
                sim.copy_data_from(template);
                sim.reseed(playout_seed(seed, i));
                sim.playout()
            },
        )
        .fold(BatchStats::default, |mut stats, result| {
            stats.record(&result);
            stats
        })
        .reduce(BatchStats::default, BatchStats::merge);
    debug!(
        "batch of {} playouts: black wins {}, mean score {:.2}",
        stats.playouts,
        stats.black_wins,
        stats.mean_score()
    );
    stats
}

/// Run `count` playouts from `template` one after another on this thread,
/// seeded exactly like [`run_parallel`].
pub fn run_serial(template: &Simulation, count: usize) -> BatchStats {
    let seed = template.config().seed;
    let mut sim = template.clone();
    let mut stats = BatchStats::default();
    for i in 0..count {
        sim.copy_data_from(template);
        sim.reseed(playout_seed(seed, i));
        stats.record(&sim.playout());
    }
    stats
}
