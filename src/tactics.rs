//! Tactical reading contract.
//!
//! A reader looks at one group and answers whether it can be caught, with a
//! suggested point: the escape or saving capture when it lives, the
//! catching move when it does not. Deep ladder reading is supplied by
//! callers; [`LibertyReader`] is the one-ply reader playouts use by default.

use crate::board::PointValue;
use crate::position::Position;

/// Answer of a [`TacticalReader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub can_catch: bool,
    pub suggestion: Option<usize>,
}

impl Verdict {
    pub fn safe() -> Self {
        Verdict {
            can_catch: false,
            suggestion: None,
        }
    }
}

pub trait TacticalReader: Send + Sync {
    /// Read the group containing the stone at `xy`.
    fn read(&mut self, position: &Position, xy: usize) -> Verdict;

    fn box_clone(&self) -> Box<dyn TacticalReader>;
}

impl Clone for Box<dyn TacticalReader> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Reads a group in atari one move deep.
///
/// The group escapes if it can capture an adjacent group that is itself in
/// atari, or if extending on its liberty gives it at least `safe_liberties`.
#[derive(Clone, Debug)]
pub struct LibertyReader {
    pub safe_liberties: usize,
    buf: Vec<usize>,
}

impl Default for LibertyReader {
    fn default() -> Self {
        Self::new(3)
    }
}

impl LibertyReader {
    pub fn new(safe_liberties: usize) -> Self {
        LibertyReader {
            safe_liberties,
            buf: Vec::with_capacity(8),
        }
    }
}

impl TacticalReader for LibertyReader {
    fn read(&mut self, position: &Position, xy: usize) -> Verdict {
        let Some(color) = position.board[xy].color() else {
            return Verdict::safe();
        };
        let Some(liberty) = position.single_liberty(xy) else {
            return Verdict::safe();
        };

        // Capturing a neighbour in atari gives the group air.
        let geo = position.geometry();
        let enemy = color.opponent().stone();
        for s in position.group_stones(xy) {
            for n in geo.neighbours(s) {
                if position.board[n] != enemy {
                    continue;
                }
                if let Some(capture) = position.single_liberty(n) {
                    return Verdict {
                        can_catch: false,
                        suggestion: Some(capture),
                    };
                }
            }
        }

        let libs = position.liberties_after(liberty, color, self.safe_liberties, &mut self.buf);
        if libs >= self.safe_liberties {
            Verdict {
                can_catch: false,
                suggestion: Some(liberty),
            }
        } else {
            Verdict {
                can_catch: true,
                suggestion: Some(liberty),
            }
        }
    }

    fn box_clone(&self) -> Box<dyn TacticalReader> {
        Box::new(self.clone())
    }
}

/// Whether the stone at `xy` belongs to a group `reader` considers lost.
pub fn is_lost(reader: &mut dyn TacticalReader, position: &Position, xy: usize) -> bool {
    position.board[xy] != PointValue::Empty && reader.read(position, xy).can_catch
}
