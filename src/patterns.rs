//! 3x3 shape patterns for the playout pattern generator.
//!
//! The 8 cells around a point are packed into a 16-bit code, two bits per
//! cell: orthogonal cells in the low byte, diagonal cells in the high byte,
//! each cell's low bit at its slot and its high bit four slots up. A lazily
//! built 64K-bit table answers whether a code matches any pattern under any
//! rotation, reflection or color swap.

use std::sync::OnceLock;

use crate::board::{Color, PointValue};
use crate::position::Position;

/// Source shapes, 3x3 grids read row by row, centre is the candidate point.
/// - X: side to move
/// - O: opponent
/// - .: empty
/// - #: off board
/// - x: anything but X
/// - o: anything but O
/// - ?: anything
const SHAPES: &[&[u8; 9]] = &[
    // hane
    b"XOX...???",
    b"XO....?.?",
    b"XO?X..x.?",
    // diagonal attachment
    b".O.X.....",
    // cuts
    b"XO?O.o?o?",
    b"XO?O.X???",
    b"?X?O.Oooo",
    b"OX?o.O???",
    // first line
    b"X.?O.?##?",
    b"OX?X.O###",
    b"?X?x.O###",
    b"?XOx.x###",
    b"?OXX.O###",
];

/// The 8 symmetries of the grid as cell permutations: `out[i] = src[perm[i]]`.
const SYMMETRIES: [[usize; 9]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8],
    [2, 5, 8, 1, 4, 7, 0, 3, 6],
    [8, 7, 6, 5, 4, 3, 2, 1, 0],
    [6, 3, 0, 7, 4, 1, 8, 5, 2],
    [2, 1, 0, 5, 4, 3, 8, 7, 6],
    [6, 7, 8, 3, 4, 5, 0, 1, 2],
    [0, 3, 6, 1, 4, 7, 2, 5, 8],
    [8, 5, 2, 7, 4, 1, 6, 3, 0],
];

/// Slot of each grid cell in the code; the centre has none.
///
/// ```text
///  NW N NE      11 0  8
///  W  .  E  ->   3 .  1
///  SW S SE      10 2  9
/// ```
const CELL_SLOT: [Option<u32>; 9] = [
    Some(11),
    Some(0),
    Some(8),
    Some(3),
    None,
    Some(1),
    Some(10),
    Some(2),
    Some(9),
];

struct Pat3Table {
    bits: Box<[u64; 1024]>,
}

impl Pat3Table {
    fn build() -> Self {
        let mut table = Pat3Table {
            bits: Box::new([0; 1024]),
        };
        for shape in SHAPES {
            for perm in &SYMMETRIES {
                let turned: [u8; 9] = perm.map(|i| shape[i]);
                table.insert_expanded(&turned);
                table.insert_expanded(&swap_colors(&turned));
            }
        }
        table
    }

    fn insert_expanded(&mut self, grid: &[u8; 9]) {
        let mut codes = vec![0u16];
        for (cell, slot) in grid.iter().zip(CELL_SLOT) {
            let Some(slot) = slot else { continue };
            let choices: &[u8] = match cell {
                b'?' => b"XO.#",
                b'x' => b"O.#",
                b'o' => b"X.#",
                _ => std::slice::from_ref(cell),
            };
            codes = codes
                .iter()
                .flat_map(|&code| choices.iter().map(move |&v| code | cell_bits(v, slot)))
                .collect();
        }
        for code in codes {
            self.bits[(code >> 6) as usize] |= 1 << (code & 63);
        }
    }

    #[inline]
    fn contains(&self, code: u16) -> bool {
        ((self.bits[(code >> 6) as usize] >> (code & 63)) & 1) == 1
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

static TABLE: OnceLock<Pat3Table> = OnceLock::new();

fn table() -> &'static Pat3Table {
    TABLE.get_or_init(Pat3Table::build)
}

/// Build the table now rather than on the first match.
pub fn init_patterns() {
    table();
}

/// Whether the surroundings of the empty point `xy` match a pattern for
/// `color` to play there.
#[inline]
pub fn pat3_match(pos: &Position, xy: usize, color: Color) -> bool {
    table().contains(env8(pos, xy, color))
}

/// Code of the 8 cells around `xy`, with `color` as X.
fn env8(pos: &Position, xy: usize, color: Color) -> u16 {
    let geo = pos.geometry();
    let own = color.stone();
    let symbol = |p: usize| match pos.board[p] {
        PointValue::Empty => b'.',
        PointValue::Edge => b'#',
        v if v == own => b'X',
        _ => b'O',
    };
    let straight = geo.neighbours(xy);
    let diagonal = geo.diagonals(xy);
    (0..4).fold(0, |code, p| {
        code | cell_bits(symbol(straight[p]), p as u32)
            | cell_bits(symbol(diagonal[p]), 8 + p as u32)
    })
}

/// Code of a concrete grid.
#[cfg(test)]
fn grid_code(grid: &[u8; 9]) -> u16 {
    grid.iter()
        .zip(CELL_SLOT)
        .filter_map(|(&cell, slot)| slot.map(|s| cell_bits(cell, s)))
        .fold(0, |code, bits| code | bits)
}

/// Two bits for one cell (O = 0, X = 1, . = 2, # = 3), placed at `slot`.
#[inline]
fn cell_bits(cell: u8, slot: u32) -> u16 {
    let value: u16 = match cell {
        b'X' => 1,
        b'.' => 2,
        b'#' => 3,
        _ => 0,
    };
    ((value & 1) | ((value >> 1) << 4)) << slot
}

fn swap_colors(grid: &[u8; 9]) -> [u8; 9] {
    grid.map(|c| match c {
        b'X' => b'O',
        b'O' => b'X',
        b'x' => b'o',
        b'o' => b'x',
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(moves: &[&str]) -> Position {
        let mut pos = Position::new(9);
        for mv in moves {
            let xy = pos.geometry().parse_coord(mv).unwrap();
            pos.play(xy).unwrap();
        }
        pos
    }

    #[test]
    fn test_table_is_populated() {
        let table = Pat3Table::build();
        assert!(table.len() > 1000, "only {} codes", table.len());
        assert!(!table.contains(grid_code(b".........")));
    }

    #[test]
    fn test_empty_surroundings_code() {
        assert_eq!(grid_code(b"........."), 0xF0F0);
        let pos = Position::new(9);
        let e5 = pos.geometry().parse_coord("E5").unwrap();
        assert_eq!(env8(&pos, e5, Color::Black), 0xF0F0);
    }

    #[test]
    fn test_env8_corner() {
        let pos = Position::new(9);
        let a9 = pos.geometry().parse_coord("A9").unwrap();
        assert_eq!(env8(&pos, a9, Color::Black), grid_code(b"####..#.."));
    }

    #[test]
    fn test_symmetric_shapes_match() {
        let table = Pat3Table::build();
        // The first hane shape turned on its side, and with colors swapped.
        assert!(table.contains(grid_code(b"X..O..X..")));
        assert!(table.contains(grid_code(b"OXO......")));
    }

    #[test]
    fn test_pat3_match_on_board() {
        // Black C5 E5 and white D6 around D5.
        let pos = setup(&["C5", "D6", "E5"]);
        let d5 = pos.geometry().parse_coord("D5").unwrap();
        assert!(pat3_match(&pos, d5, Color::Black));
        assert!(pat3_match(&pos, d5, Color::White));
        let e8 = pos.geometry().parse_coord("E8").unwrap();
        assert!(!pat3_match(&pos, e8, Color::Black));
    }
}
