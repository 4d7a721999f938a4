//! Engine defaults and playout heuristic parameters.
//!
//! The board size is a runtime setting (see [`crate::config`]); the values
//! here are only the defaults a fresh [`crate::simulation::Simulation`] starts
//! with.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Smallest board the engine accepts.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest board the engine accepts.
pub const MAX_BOARD_SIZE: usize = 25;

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 7.5;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker (index 0 is border padding, so it never names a point).
pub const PASS_MOVE: usize = 0;

// =============================================================================
// Playout Termination
// =============================================================================

/// Mercy rule: a playout stops once the stone difference exceeds
/// `MERCY_FACTOR * board_size`.
pub const MERCY_FACTOR: usize = 3;

/// Runaway guard: a playout stops once it has played more than
/// `LENGTH_FACTOR * initial empty points` moves.
pub const LENGTH_FACTOR: usize = 3;

// =============================================================================
// Playout Heuristic Probabilities
// =============================================================================

/// Probability of using the capture generator in a playout ply.
pub const PROB_HEURISTIC_CAPTURE: f64 = 0.9;

/// Probability of using the atari-escape generator in a playout ply.
pub const PROB_HEURISTIC_ESCAPE: f64 = 0.9;

/// Probability of using the 3x3 pattern generator in a playout ply.
pub const PROB_HEURISTIC_PAT3: f64 = 0.95;

/// Weight every empty point starts with in the probability map.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Numeric slack used when comparing accumulated weights.
pub const WEIGHT_EPSILON: f64 = 1e-6;
