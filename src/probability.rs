//! Weighted sampler over board points.
//!
//! Every point carries a non-negative weight. Weights are summed per board
//! row and overall, so a draw scans the rows first and then the points of a
//! single row: O(sqrt N) per draw on an N-point board, O(1) per update.

use fastrand::Rng;

use crate::constants::WEIGHT_EPSILON;
use crate::empty_points::EmptyPoints;
use crate::geometry::Geometry;

#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityMap {
    geo: Geometry,
    weights: Vec<f64>,
    row_sums: Vec<f64>,
    total: f64,
}

impl ProbabilityMap {
    pub fn new(geo: Geometry) -> Self {
        ProbabilityMap {
            geo,
            weights: vec![0.0; geo.len],
            row_sums: vec![0.0; geo.size + 2],
            total: 0.0,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geo
    }

    /// Zero every weight.
    pub fn clear(&mut self) {
        self.weights.fill(0.0);
        self.row_sums.fill(0.0);
        self.total = 0.0;
    }

    /// Give every empty point `weight` and everything else zero.
    pub fn rebuild(&mut self, empty: &EmptyPoints, weight: f64) {
        self.clear();
        for xy in empty.iter() {
            self.weights[xy] = weight;
        }
        self.recompute_sums();
    }

    /// Recompute row sums and the total from the point weights, dropping any
    /// accumulated rounding error.
    pub fn recompute_sums(&mut self) {
        let geo = self.geo;
        self.row_sums.fill(0.0);
        for xy in geo.points() {
            self.row_sums[geo.y(xy)] += self.weights[xy];
        }
        self.total = self.row_sums.iter().sum();
    }

    #[inline]
    pub fn weight(&self, xy: usize) -> f64 {
        self.weights[xy]
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn row_sum(&self, y: usize) -> f64 {
        self.row_sums[y]
    }

    #[inline]
    pub fn add(&mut self, xy: usize, weight: f64) {
        debug_assert!(weight >= 0.0);
        self.weights[xy] += weight;
        self.row_sums[self.geo.y(xy)] += weight;
        self.total += weight;
    }

    /// Lower the weight of `xy`, never below zero.
    #[inline]
    pub fn subtract(&mut self, xy: usize, weight: f64) {
        let weight = weight.min(self.weights[xy]);
        self.weights[xy] -= weight;
        self.row_sums[self.geo.y(xy)] -= weight;
        self.total -= weight;
    }

    /// Set the weight of `xy` to zero and return what it was.
    #[inline]
    pub fn reset(&mut self, xy: usize) -> f64 {
        let old = self.weights[xy];
        if old != 0.0 {
            self.weights[xy] = 0.0;
            self.row_sums[self.geo.y(xy)] -= old;
            self.total -= old;
        }
        old
    }

    /// Draw a point with probability proportional to its weight, or `None`
    /// when no weight is left.
    pub fn get_coordinate(&self, rng: &mut Rng) -> Option<usize> {
        if self.total <= WEIGHT_EPSILON {
            return None;
        }
        let geo = &self.geo;
        let mut r = rng.f64() * self.total;

        let mut row = None;
        for y in 1..=geo.size {
            let sum = self.row_sums[y];
            if sum <= 0.0 {
                continue;
            }
            row = Some(y);
            if r < sum {
                break;
            }
            r -= sum;
        }
        let y = row?;

        let mut last = None;
        for x in 1..=geo.size {
            let xy = geo.xy(x, y);
            let w = self.weights[xy];
            if w <= 0.0 {
                continue;
            }
            last = Some(xy);
            if r < w {
                return Some(xy);
            }
            r -= w;
        }
        // Rounding left r past the end of the row.
        last
    }

    /// Whether the row sums and total match the point weights.
    pub fn is_consistent(&self) -> bool {
        let geo = &self.geo;
        let mut total = 0.0;
        for y in 1..=geo.size {
            let row: f64 = (1..=geo.size).map(|x| self.weights[geo.xy(x, y)]).sum();
            if (row - self.row_sums[y]).abs() > WEIGHT_EPSILON {
                return false;
            }
            total += row;
        }
        (total - self.total).abs() <= WEIGHT_EPSILON
    }
}
