//! go-playout: the position and playout core of a Go engine.
//!
//! This crate keeps an incrementally updated Go position (groups, liberties,
//! captures, ko, checksum) and drives heuristic random playouts on it, the
//! inner loop of a Monte Carlo search.
//!
//! ## Modules
//!
//! - [`geometry`] - Padded 1-D board layout and neighbour tables
//! - [`position`] - Board state, legality, captures, both liberty modes
//! - [`probability`] - Weighted sampler over board points
//! - [`generators`] / [`filters`] - Pluggable playout heuristics
//! - [`selection`] - Move selection pipeline
//! - [`playout`] - Playout driver and area scoring
//! - [`simulation`] - Position, selector and RNG bundled for forking
//! - [`batch`] - Parallel playout batches
//!
//! ## Example
//!
//! ```
//! use go_playout::config::EngineConfig;
//! use go_playout::simulation::Simulation;
//!
//! let mut sim = Simulation::with_default_heuristics(EngineConfig::default());
//! let d4 = sim.position().geometry().parse_coord("D4").unwrap();
//! sim.play(d4).unwrap();
//!
//! let mut branch = sim.fork();
//! let result = branch.playout();
//! println!("{:?}: {:+.1}", result.state, result.score);
//! ```

pub mod batch;
pub mod board;
pub mod config;
pub mod constants;
pub mod empty_points;
pub mod filters;
pub mod generators;
pub mod geometry;
pub mod patterns;
pub mod playout;
pub mod position;
pub mod probability;
pub mod selection;
pub mod simulation;
pub mod tactics;
pub mod zobrist;
