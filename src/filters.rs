//! Move filters: predicates that veto sampled playout moves.
//!
//! A filter answers `true` from [`MoveFilter::reject`] to refuse a point for
//! the given color. The selector only plays a sampled point that every
//! registered filter lets through.

use crate::board::{Color, PointValue};
use crate::position::Position;

pub trait MoveFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called when attached to a position and after it is cleared or resized.
    fn register(&mut self, _position: &Position) {}

    /// Whether `color` should not play at the empty point `xy`.
    fn reject(&mut self, position: &Position, xy: usize, color: Color) -> bool;

    fn box_clone(&self) -> Box<dyn MoveFilter>;
}

impl Clone for Box<dyn MoveFilter> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Never fill an own eye.
#[derive(Clone, Copy, Debug, Default)]
pub struct EyeFilter;

impl MoveFilter for EyeFilter {
    fn name(&self) -> &'static str {
        "eye"
    }

    fn reject(&mut self, position: &Position, xy: usize, color: Color) -> bool {
        position.is_eye(xy, color)
    }

    fn box_clone(&self) -> Box<dyn MoveFilter> {
        Box::new(*self)
    }
}

/// Refuse moves that leave a group of two or more stones in atari.
///
/// A lone stone in atari is allowed: throw-ins are too useful to forbid.
#[derive(Clone, Debug, Default)]
pub struct SelfAtariFilter {
    buf: Vec<usize>,
}

impl MoveFilter for SelfAtariFilter {
    fn name(&self) -> &'static str {
        "self-atari"
    }

    fn reject(&mut self, position: &Position, xy: usize, color: Color) -> bool {
        let own = color.stone();
        let connects = position.geometry().neighbours(xy).iter().any(|&n| position.board[n] == own);
        connects && position.liberties_after(xy, color, 2, &mut self.buf) < 2
    }

    fn box_clone(&self) -> Box<dyn MoveFilter> {
        Box::new(self.clone())
    }
}

/// Refuse first- and second-line moves with no stone within distance two.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyEdgeFilter;

impl MoveFilter for EmptyEdgeFilter {
    fn name(&self) -> &'static str {
        "empty-edge"
    }

    fn reject(&mut self, position: &Position, xy: usize, _color: Color) -> bool {
        let geo = position.geometry();
        geo.line_height(xy) <= 1 && geo.twelve(xy).all(|p| position.board[p] == PointValue::Empty)
    }

    fn box_clone(&self) -> Box<dyn MoveFilter> {
        Box::new(*self)
    }
}

/// Refuse every point of a fixed region.
///
/// Points are given as coordinates of the registered position; the mask is
/// rebuilt on every registration so it follows board resizes.
#[derive(Clone, Debug, Default)]
pub struct FogFilter {
    points: Vec<usize>,
    mask: Vec<bool>,
}

impl FogFilter {
    pub fn new(points: impl IntoIterator<Item = usize>) -> Self {
        FogFilter {
            points: points.into_iter().collect(),
            mask: Vec::new(),
        }
    }

    pub fn is_fogged(&self, xy: usize) -> bool {
        self.mask.get(xy).copied().unwrap_or(false)
    }
}

impl MoveFilter for FogFilter {
    fn name(&self) -> &'static str {
        "fog"
    }

    fn register(&mut self, position: &Position) {
        let geo = position.geometry();
        self.mask.clear();
        self.mask.resize(geo.len, false);
        for &xy in &self.points {
            if geo.is_on_board(xy) {
                self.mask[xy] = true;
            }
        }
    }

    fn reject(&mut self, _position: &Position, xy: usize, _color: Color) -> bool {
        self.is_fogged(xy)
    }

    fn box_clone(&self) -> Box<dyn MoveFilter> {
        Box::new(self.clone())
    }
}
