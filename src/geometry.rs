//! Board geometry: the padded 1-D layout and neighbour offset tables.
//!
//! A board of side `N` is stored row by row with a stride of `N + 1`. Column 0
//! of every row is border, and so are the whole first and last rows, so a
//! single border column is shared between the right edge of one row and the
//! left edge of the next. The array holds `(N + 1) * (N + 2) + 1` cells; the
//! extra cell is the south-east diagonal of the last point.
//!
//! ```text
//!  N = 3, stride 4
//!   0  1  2  3
//!   4 [5  6  7]
//!   8 [9 10 11]
//!  12 [13 14 15]
//!  16 17 18 19 20
//! ```
//!
//! Border cells act as sentinels, so the 4- and 8-neighbourhoods of any point
//! can be read without bounds checks.

use crate::constants::PASS_MOVE;

/// Layout of one board size.
///
/// `Geometry` is `Copy` and carries the offset tables, so every position of
/// the same size shares identical read-only tables without any global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Board side length.
    pub size: usize,
    /// Row stride (`size + 1`).
    pub width: usize,
    /// Length of every per-point array.
    pub len: usize,
    /// First on-board index.
    pub first: usize,
    /// Last on-board index.
    pub last: usize,
    /// Orthogonal offsets: N, E, S, W.
    pub four: [isize; 4],
    /// Diagonal offsets: NE, SE, SW, NW.
    pub diagonal: [isize; 4],
    /// Distance-two offsets along the axes: N, E, S, W.
    pub far: [isize; 4],
}

impl Geometry {
    pub fn new(size: usize) -> Self {
        let width = size + 1;
        let w = width as isize;
        Geometry {
            size,
            width,
            len: (size + 1) * (size + 2) + 1,
            first: width + 1,
            last: size * width + size,
            four: [-w, 1, w, -1],
            diagonal: [1 - w, w + 1, w - 1, -w - 1],
            far: [-2 * w, 2, 2 * w, -2],
        }
    }

    /// Index of the point at column `x`, row `y` (both 1-based, row 1 at the top).
    #[inline]
    pub fn xy(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn x(&self, xy: usize) -> usize {
        xy % self.width
    }

    #[inline]
    pub fn y(&self, xy: usize) -> usize {
        xy / self.width
    }

    /// Whether `xy` names a real point (not border, not out of range).
    #[inline]
    pub fn is_on_board(&self, xy: usize) -> bool {
        xy >= self.first && xy <= self.last && self.x(xy) != 0
    }

    /// Number of real points.
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Iterate over every real point in index order.
    pub fn points(&self) -> impl Iterator<Item = usize> + '_ {
        (self.first..=self.last).filter(move |&xy| self.x(xy) != 0)
    }

    /// The 4 orthogonal neighbours (N, E, S, W) of an on-board point.
    #[inline]
    pub fn neighbours(&self, xy: usize) -> [usize; 4] {
        self.four.map(|d| xy.wrapping_add_signed(d))
    }

    /// The 4 diagonal neighbours (NE, SE, SW, NW) of an on-board point.
    #[inline]
    pub fn diagonals(&self, xy: usize) -> [usize; 4] {
        self.diagonal.map(|d| xy.wrapping_add_signed(d))
    }

    /// All 8 neighbours of an on-board point, orthogonal first.
    #[inline]
    pub fn eight(&self, xy: usize) -> [usize; 8] {
        let n = self.neighbours(xy);
        let d = self.diagonals(xy);
        [n[0], n[1], n[2], n[3], d[0], d[1], d[2], d[3]]
    }

    /// The on-board points of the 12-neighbourhood (Manhattan distance <= 2).
    ///
    /// The distance-two offsets can leave the array or wrap across the shared
    /// border column, so unlike the 4- and 8-neighbourhoods these are filtered.
    pub fn twelve(&self, xy: usize) -> impl Iterator<Item = usize> + '_ {
        let near = self.eight(xy);
        let far = self.far.map(|d| xy.checked_add_signed(d).unwrap_or(0));
        let x = self.x(xy);
        near.into_iter()
            .chain(far)
            .filter(move |&p| self.is_on_board(p) && self.x(p).abs_diff(x) <= 2)
    }

    /// Distance to the nearest edge, 0 for the first line.
    pub fn line_height(&self, xy: usize) -> usize {
        let x = self.x(xy);
        let y = self.y(xy);
        let dx = (x - 1).min(self.size - x);
        let dy = (y - 1).min(self.size - y);
        dx.min(dy)
    }

    /// Parse a coordinate string such as `"D4"` or `"pass"`.
    ///
    /// Columns use letters A-T skipping I, rows count from 1 at the bottom.
    /// Returns `None` for malformed or off-board input.
    pub fn parse_coord(&self, s: &str) -> Option<usize> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pass") {
            return Some(PASS_MOVE);
        }

        let bytes = s.as_bytes();
        if bytes.len() < 2 {
            return None;
        }

        let col_char = bytes[0].to_ascii_uppercase();
        if !col_char.is_ascii_uppercase() || col_char == b'I' {
            return None;
        }
        let mut col = (col_char - b'A' + 1) as usize;
        // Skip 'I' column (Go convention to avoid confusion with 'J')
        if col_char > b'I' {
            col -= 1;
        }

        let row: usize = s[1..].parse().ok()?;
        if col > self.size || row == 0 || row > self.size {
            return None;
        }

        Some(self.xy(col, self.size - row + 1))
    }

    /// Format a point as a coordinate string; `"pass"` for [`PASS_MOVE`].
    pub fn str_coord(&self, xy: usize) -> String {
        if xy == PASS_MOVE {
            return "pass".into();
        }

        let col = self.x(xy);
        let row = self.y(xy);

        // Convert column to letter, skipping 'I'
        let mut c = (b'@' + col as u8) as char;
        if c >= 'I' {
            c = (c as u8 + 1) as char;
        }

        format!("{c}{}", self.size + 1 - row)
    }
}
