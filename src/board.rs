//! Point values and stone colors.

use std::fmt;

/// A stone color, also used for the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Index into per-color tables (`Black = 0`, `White = 1`).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The board value of a stone of this color.
    #[inline]
    pub fn stone(self) -> PointValue {
        match self {
            Color::Black => PointValue::Black,
            Color::White => PointValue::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// Content of one cell of the padded board array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PointValue {
    #[default]
    Empty,
    Black,
    White,
    Edge,
}

impl PointValue {
    /// The stone color at this cell, if any.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            PointValue::Black => Some(Color::Black),
            PointValue::White => Some(Color::White),
            _ => None,
        }
    }

    #[inline]
    pub fn is_stone(self) -> bool {
        matches!(self, PointValue::Black | PointValue::White)
    }

    /// Character used when rendering a board.
    pub fn symbol(self) -> char {
        match self {
            PointValue::Empty => '.',
            PointValue::Black => 'X',
            PointValue::White => 'O',
            PointValue::Edge => '#',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        for c in [Color::Black, Color::White] {
            assert_eq!(c.opponent().opponent(), c);
            assert_ne!(c.opponent(), c);
        }
    }

    #[test]
    fn test_stone_roundtrip() {
        assert_eq!(Color::Black.stone().color(), Some(Color::Black));
        assert_eq!(Color::White.stone().color(), Some(Color::White));
        assert_eq!(PointValue::Edge.color(), None);
        assert!(!PointValue::Empty.is_stone());
    }
}
