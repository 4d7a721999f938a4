//! A playable simulation state: position, move selector and RNG together.
//!
//! Each `Simulation` owns everything a playout mutates, so independent
//! copies can run on different threads without sharing. [`Simulation::fork`]
//! and [`Simulation::copy_data_from`] produce such copies; the zobrist table
//! is the only data they share, read-only.

use fastrand::Rng;
use log::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::filters::{EyeFilter, MoveFilter, SelfAtariFilter};
use crate::generators::{AtariEscapeGenerator, CaptureGenerator, MoveGenerator, PatternGenerator};
use crate::playout::{self, PlayoutResult};
use crate::position::{MoveError, Position};
use crate::selection::MoveSelector;

#[derive(Clone)]
pub struct Simulation {
    position: Position,
    selector: MoveSelector,
    rng: Rng,
    config: EngineConfig,
}

impl Simulation {
    /// A simulation with no generators or filters: playouts sample plain
    /// legal moves.
    pub fn new(config: EngineConfig) -> Self {
        let mut position = Position::with_mode(config.board_size, config.liberty_mode);
        position.komi = config.komi;
        let mut selector = MoveSelector::new(*position.geometry(), config.weighted);
        selector.register(&position);
        Simulation {
            position,
            selector,
            rng: Rng::with_seed(config.seed),
            config,
        }
    }

    /// A simulation with the usual playout heuristics: capture, atari
    /// escape and 3x3 patterns, then eye and self-atari filters.
    pub fn with_default_heuristics(config: EngineConfig) -> Self {
        let mut sim = Self::new(config);
        sim.add_generator(Box::new(CaptureGenerator::default()));
        sim.add_generator(Box::new(AtariEscapeGenerator::default()));
        sim.add_generator(Box::new(PatternGenerator::default()));
        sim.add_filter(Box::new(EyeFilter));
        sim.add_filter(Box::new(SelfAtariFilter::default()));
        sim
    }

    /// The current position. Moves go through [`Simulation::play`] so the
    /// selector sees them.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    pub fn add_generator(&mut self, generator: Box<dyn MoveGenerator>) {
        self.selector.add_generator(generator, &self.position);
    }

    pub fn add_filter(&mut self, filter: Box<dyn MoveFilter>) {
        self.selector.add_filter(filter, &self.position);
    }

    /// Play a move for the side to move.
    pub fn play(&mut self, xy: usize) -> Result<(), MoveError> {
        self.position.play(xy)?;
        self.selector.after_move(&self.position);
        Ok(())
    }

    /// Start a new game on an empty board.
    pub fn clear(&mut self) {
        self.position.clear();
        self.position.komi = self.config.komi;
        self.selector.register(&self.position);
        debug!("cleared {}x{} board", self.config.board_size, self.config.board_size);
    }

    /// Apply a configuration setting. A board size or liberty mode change
    /// resets the game; komi applies in place.
    pub fn set(&mut self, name: &str, value: &str) -> Result<bool, ConfigError> {
        let before = self.config.clone();
        if !self.config.set(name, value)? {
            debug!("ignoring unknown setting {name}");
            return Ok(false);
        }
        debug!("set {name} = {value}");

        if self.config.board_size != before.board_size
            || self.config.liberty_mode != before.liberty_mode
        {
            self.position = Position::with_mode(self.config.board_size, self.config.liberty_mode);
            self.clear();
        }
        if self.config.komi != before.komi {
            self.position.komi = self.config.komi;
        }
        if self.config.weighted != before.weighted {
            self.selector.set_weighted(self.config.weighted, &self.position);
        }
        if self.config.seed != before.seed {
            self.rng.seed(self.config.seed);
        }
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.config.get(name)
    }

    /// Run one playout from the current position, which is left at the
    /// final position.
    pub fn playout(&mut self) -> PlayoutResult {
        playout::playout(&mut self.position, &mut self.selector, &mut self.rng, self.config.mercy)
    }

    /// An independent copy with its own random stream, drawn from this one.
    pub fn fork(&mut self) -> Simulation {
        let mut copy = self.clone();
        copy.rng = Rng::with_seed(self.rng.u64(..));
        copy
    }

    /// Take over the game state and plugins of `source`, reusing this
    /// simulation's allocations. The random stream is left alone.
    pub fn copy_data_from(&mut self, source: &Simulation) {
        self.position.copy_data_from(&source.position);
        self.selector.copy_data_from(&source.selector);
        self.config.clone_from(&source.config);
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }
}
