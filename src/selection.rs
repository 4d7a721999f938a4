//! Weighted move selection for playouts.
//!
//! Generators are asked first, in registration order; the first legal
//! non-pass proposal is played. Otherwise a point is drawn from the
//! probability map (or uniformly from the empty points) and kept only if it
//! is legal and no filter rejects it. Rejected points are parked with zero
//! weight until the draw succeeds or nothing is left, then restored.

use fastrand::Rng;

use crate::board::Color;
use crate::constants::{DEFAULT_WEIGHT, PASS_MOVE};
use crate::filters::MoveFilter;
use crate::generators::MoveGenerator;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::probability::ProbabilityMap;

#[derive(Clone)]
pub struct MoveSelector {
    generators: Vec<Box<dyn MoveGenerator>>,
    filters: Vec<Box<dyn MoveFilter>>,
    weights: ProbabilityMap,
    weighted: bool,
    parked: Vec<(usize, f64)>,
}

impl MoveSelector {
    pub fn new(geo: Geometry, weighted: bool) -> Self {
        MoveSelector {
            generators: Vec::new(),
            filters: Vec::new(),
            weights: ProbabilityMap::new(geo),
            weighted,
            parked: Vec::with_capacity(geo.area()),
        }
    }

    pub fn add_generator(&mut self, mut generator: Box<dyn MoveGenerator>, position: &Position) {
        generator.register(position);
        self.generators.push(generator);
    }

    pub fn add_filter(&mut self, mut filter: Box<dyn MoveFilter>, position: &Position) {
        filter.register(position);
        self.filters.push(filter);
    }

    pub fn generator_names(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn weights(&self) -> &ProbabilityMap {
        &self.weights
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Switch between weighted and uniform sampling. The weights are rebuilt
    /// from `position` when weighting is turned on.
    pub fn set_weighted(&mut self, weighted: bool, position: &Position) {
        self.weighted = weighted;
        if weighted {
            self.weights.rebuild(&position.empty_points, DEFAULT_WEIGHT);
        }
    }

    /// Bind to `position` after it was created, cleared, resized or replaced:
    /// rebuild the weights from its empty points and re-register every plugin.
    pub fn register(&mut self, position: &Position) {
        if self.weights.geometry() != position.geometry() {
            self.weights = ProbabilityMap::new(*position.geometry());
        }
        self.weights.rebuild(&position.empty_points, DEFAULT_WEIGHT);
        for generator in &mut self.generators {
            generator.register(position);
        }
        for filter in &mut self.filters {
            filter.register(position);
        }
    }

    /// Follow the move just committed to `position`.
    pub fn after_move(&mut self, position: &Position) {
        if self.weighted {
            if let Some(xy) = position.last_move().filter(|&xy| xy != PASS_MOVE) {
                self.weights.reset(xy);
            }
            for &xy in position.last_captures() {
                self.weights.add(xy, DEFAULT_WEIGHT);
            }
        }
        for generator in &mut self.generators {
            generator.update(position);
        }
    }

    /// Pick the next move for the side to move; [`PASS_MOVE`] when nothing
    /// acceptable is left.
    pub fn select(&mut self, position: &Position, rng: &mut Rng) -> usize {
        for generator in &mut self.generators {
            if let Some(xy) = generator.generate(position, rng) {
                if xy != PASS_MOVE && position.is_legal(xy) {
                    return xy;
                }
            }
        }
        if self.weighted {
            self.select_weighted(position, rng)
        } else {
            self.select_uniform(position, rng)
        }
    }

    fn select_weighted(&mut self, position: &Position, rng: &mut Rng) -> usize {
        let color = position.to_move;
        let mut chosen = PASS_MOVE;
        while let Some(xy) = self.weights.get_coordinate(rng) {
            if accepts(&mut self.filters, position, xy, color) {
                chosen = xy;
                break;
            }
            let weight = self.weights.reset(xy);
            self.parked.push((xy, weight));
        }
        for (xy, weight) in self.parked.drain(..) {
            self.weights.add(xy, weight);
        }
        chosen
    }

    fn select_uniform(&mut self, position: &Position, rng: &mut Rng) -> usize {
        let empty = &position.empty_points;
        let n = empty.len();
        if n == 0 {
            return PASS_MOVE;
        }
        let color = position.to_move;
        let start = rng.usize(..n);
        (0..n)
            .map(|i| empty.get((start + i) % n))
            .find(|&xy| accepts(&mut self.filters, position, xy, color))
            .unwrap_or(PASS_MOVE)
    }

    /// Take over plugins and weights from `source`.
    pub fn copy_data_from(&mut self, source: &MoveSelector) {
        self.generators.clone_from(&source.generators);
        self.filters.clone_from(&source.filters);
        self.weights.clone_from(&source.weights);
        self.weighted = source.weighted;
        self.parked.clear();
    }
}

fn accepts(
    filters: &mut [Box<dyn MoveFilter>],
    position: &Position,
    xy: usize,
    color: Color,
) -> bool {
    position.is_legal(xy) && !filters.iter_mut().any(|f| f.reject(position, xy, color))
}
