//! Go position representation and move execution.
//!
//! This module provides the incrementally updated board state the playouts
//! run on:
//! - Board values on a padded 1-D array (see [`crate::geometry`])
//! - Groups as circular lists threaded through `chain_next`, identified by a
//!   representative point stored in `chain`
//! - Per-group liberty counts, kept either exactly or as pseudo-liberties
//!   depending on [`LibertyMode`]
//! - Per-point neighbour and diagonal counts split by color, with border
//!   cells counting for both colors
//! - The empty-point set, ko point, checksum, stone ages and move stacks
//!
//! Every array is public so move generators and filters can read the state
//! without going through accessors. Mutating them directly breaks the
//! incremental bookkeeping; [`Position::verify`] recomputes everything from
//! the raw board and reports the first disagreement.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::board::{Color, PointValue};
use crate::constants::PASS_MOVE;
use crate::empty_points::EmptyPoints;
use crate::geometry::Geometry;
use crate::zobrist::Zobrist;

/// How group liberties are accounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LibertyMode {
    /// True, de-duplicated liberty counts. Needed by tactical reading.
    #[default]
    Exact,
    /// Sum of empty neighbours over all stones, counting a shared liberty
    /// once per adjacent stone. Cheaper, and zero exactly when the group has
    /// no liberties, so captures and legality are unaffected.
    Pseudo,
}

/// Reason a move was refused by [`Position::play`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: point {0} is not on the board")]
    OffBoard(usize),
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: retakes ko")]
    Ko,
    #[error("illegal move: suicide")]
    Suicide,
}

/// A disagreement between the incremental state and a recount from the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Inconsistency {
    #[error("border cell {0} is not marked as edge")]
    Border(usize),
    #[error("empty-point set disagrees with the board at {0}")]
    EmptySet(usize),
    #[error("group membership broken at {0}")]
    Group(usize),
    #[error("group at {xy}: tracked {tracked} liberties, recount gives {counted}")]
    Liberties { xy: usize, tracked: i32, counted: i32 },
    #[error("group at {0} has no liberties left on the board")]
    Dead(usize),
    #[error("neighbour counts at {0} disagree with the board")]
    Neighbours(usize),
    #[error("stone counts disagree with the board")]
    StoneCount,
    #[error("checksum {tracked:#x} differs from recomputed {counted:#x}")]
    Checksum { tracked: u64, counted: u64 },
}

/// A candidate the search layer wants tried first, with its statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriorityMove {
    pub xy: usize,
    pub urgency: f64,
    pub visits: u32,
    pub wins: u32,
}

/// A Go position (board state).
#[derive(Clone, Debug)]
pub struct Position {
    geo: Geometry,
    mode: LibertyMode,
    zobrist: Arc<Zobrist>,
    /// Board values, border cells hold [`PointValue::Edge`].
    pub board: Vec<PointValue>,
    /// Group id (representative point) of each stone, 0 elsewhere.
    pub chain: Vec<usize>,
    /// Next stone in the same group; circular, a lone stone points at itself.
    pub chain_next: Vec<usize>,
    /// Liberties per group id. Only meaningful at representative points.
    pub liberties: Vec<i32>,
    /// Orthogonal neighbours that are stones or border.
    pub neighbours: Vec<u8>,
    /// Orthogonal neighbours per color (index with [`Color::index`]); border counts for both.
    pub color_neighbours: [Vec<u8>; 2],
    /// Diagonal neighbours per color; border counts for both.
    pub color_diagonals: [Vec<u8>; 2],
    /// Move number at which each stone was placed.
    pub stone_age: Vec<u32>,
    pub empty_points: EmptyPoints,
    /// Point the side to move may not retake, 0 if none.
    pub ko_point: usize,
    pub to_move: Color,
    /// Moves played so far, passes included.
    pub move_number: u32,
    /// Consecutive passes ending the move stack.
    pub passes: u32,
    pub komi: f64,
    pub move_stack: Vec<usize>,
    pub checksum_stack: Vec<u64>,
    pub priority_moves: Vec<PriorityMove>,
    checksum: u64,
    stones: [usize; 2],
    captures: Vec<usize>,
    history_start: u32,
    marks: Vec<u32>,
    mark_id: u32,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.geo == other.geo
            && self.mode == other.mode
            && self.checksum == other.checksum
            && self.board == other.board
            && self.chain == other.chain
            && self.chain_next == other.chain_next
            && self.liberties == other.liberties
            && self.neighbours == other.neighbours
            && self.color_neighbours == other.color_neighbours
            && self.color_diagonals == other.color_diagonals
            && self.stone_age == other.stone_age
            && self.empty_points == other.empty_points
            && self.ko_point == other.ko_point
            && self.to_move == other.to_move
            && self.move_number == other.move_number
            && self.passes == other.passes
            && self.komi == other.komi
            && self.move_stack == other.move_stack
            && self.checksum_stack == other.checksum_stack
            && self.priority_moves == other.priority_moves
            && self.stones == other.stones
            && self.history_start == other.history_start
    }
}

impl Position {
    /// An empty position with exact liberties.
    pub fn new(size: usize) -> Self {
        Self::with_mode(size, LibertyMode::Exact)
    }

    pub fn with_mode(size: usize, mode: LibertyMode) -> Self {
        let geo = Geometry::new(size);
        let len = geo.len;
        let mut pos = Position {
            geo,
            mode,
            zobrist: Arc::new(Zobrist::new(len)),
            board: vec![PointValue::Edge; len],
            chain: vec![0; len],
            chain_next: (0..len).collect(),
            liberties: vec![0; len],
            neighbours: vec![0; len],
            color_neighbours: [vec![0; len], vec![0; len]],
            color_diagonals: [vec![0; len], vec![0; len]],
            stone_age: vec![0; len],
            empty_points: EmptyPoints::new(len),
            ko_point: 0,
            to_move: Color::Black,
            move_number: 0,
            passes: 0,
            komi: crate::constants::DEFAULT_KOMI,
            move_stack: Vec::with_capacity(geo.area() * 3),
            checksum_stack: Vec::with_capacity(geo.area() * 3),
            priority_moves: Vec::new(),
            checksum: 0,
            stones: [0, 0],
            captures: Vec::with_capacity(geo.area()),
            history_start: 0,
            marks: vec![0; len],
            mark_id: 0,
        };
        pos.clear();
        pos
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geo
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.geo.size
    }

    #[inline]
    pub fn mode(&self) -> LibertyMode {
        self.mode
    }

    #[inline]
    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    /// Stones of `color` on the board.
    #[inline]
    pub fn stones(&self, color: Color) -> usize {
        self.stones[color.index()]
    }

    /// Black stones minus white stones.
    #[inline]
    pub fn stone_difference(&self) -> isize {
        self.stones[0] as isize - self.stones[1] as isize
    }

    /// Points emptied by captures during the last move.
    #[inline]
    pub fn last_captures(&self) -> &[usize] {
        &self.captures
    }

    /// The last move played, [`PASS_MOVE`] included.
    #[inline]
    pub fn last_move(&self) -> Option<usize> {
        self.move_stack.last().copied()
    }

    /// Neighbour counts of the side to move.
    #[inline]
    pub fn own_neighbours(&self) -> &[u8] {
        &self.color_neighbours[self.to_move.index()]
    }

    /// Neighbour counts of the side not to move.
    #[inline]
    pub fn other_neighbours(&self) -> &[u8] {
        &self.color_neighbours[self.to_move.opponent().index()]
    }

    #[inline]
    pub fn own_diagonals(&self) -> &[u8] {
        &self.color_diagonals[self.to_move.index()]
    }

    #[inline]
    pub fn other_diagonals(&self) -> &[u8] {
        &self.color_diagonals[self.to_move.opponent().index()]
    }

    /// Liberty count of the group the stone at `xy` belongs to.
    #[inline]
    pub fn group_liberties(&self, xy: usize) -> i32 {
        self.liberties[self.chain[xy]]
    }

    /// Reset to an empty board of the current size.
    pub fn clear(&mut self) {
        let geo = self.geo;
        self.board.fill(PointValue::Edge);
        self.chain.fill(0);
        for (i, next) in self.chain_next.iter_mut().enumerate() {
            *next = i;
        }
        self.liberties.fill(0);
        self.neighbours.fill(0);
        for counts in self.color_neighbours.iter_mut().chain(&mut self.color_diagonals) {
            counts.fill(0);
        }
        self.stone_age.fill(0);
        self.marks.fill(0);
        self.mark_id = 0;

        self.empty_points.clear();
        for xy in geo.points() {
            self.board[xy] = PointValue::Empty;
            self.empty_points.add(xy);
        }

        // Border cells count as a neighbour of either color.
        for xy in geo.points() {
            for n in geo.neighbours(xy) {
                if self.board[n] == PointValue::Edge {
                    self.neighbours[xy] += 1;
                    self.color_neighbours[0][xy] += 1;
                    self.color_neighbours[1][xy] += 1;
                }
            }
            for d in geo.diagonals(xy) {
                if self.board[d] == PointValue::Edge {
                    self.color_diagonals[0][xy] += 1;
                    self.color_diagonals[1][xy] += 1;
                }
            }
        }

        self.ko_point = 0;
        self.to_move = Color::Black;
        self.move_number = 0;
        self.passes = 0;
        self.move_stack.clear();
        self.checksum_stack.clear();
        self.priority_moves.clear();
        self.checksum = 0;
        self.stones = [0, 0];
        self.captures.clear();
        self.history_start = 0;
    }

    /// Change the board size, reallocating every array, and clear.
    pub fn resize(&mut self, size: usize) {
        if size != self.geo.size {
            let komi = self.komi;
            *self = Self::with_mode(size, self.mode);
            self.komi = komi;
        } else {
            self.clear();
        }
    }

    /// Switch liberty accounting; the board is cleared.
    pub fn set_mode(&mut self, mode: LibertyMode) {
        self.mode = mode;
        self.clear();
    }

    /// Copy all state from `source`, reusing this position's allocations.
    pub fn copy_data_from(&mut self, source: &Position) {
        self.geo = source.geo;
        self.mode = source.mode;
        if !Arc::ptr_eq(&self.zobrist, &source.zobrist) {
            self.zobrist = Arc::clone(&source.zobrist);
        }
        self.board.clone_from(&source.board);
        self.chain.clone_from(&source.chain);
        self.chain_next.clone_from(&source.chain_next);
        self.liberties.clone_from(&source.liberties);
        self.neighbours.clone_from(&source.neighbours);
        for (dst, src) in self.color_neighbours.iter_mut().zip(&source.color_neighbours) {
            dst.clone_from(src);
        }
        for (dst, src) in self.color_diagonals.iter_mut().zip(&source.color_diagonals) {
            dst.clone_from(src);
        }
        self.stone_age.clone_from(&source.stone_age);
        self.empty_points.clone_from(&source.empty_points);
        self.ko_point = source.ko_point;
        self.to_move = source.to_move;
        self.move_number = source.move_number;
        self.passes = source.passes;
        self.komi = source.komi;
        self.move_stack.clone_from(&source.move_stack);
        self.checksum_stack.clone_from(&source.checksum_stack);
        self.priority_moves.clone_from(&source.priority_moves);
        self.checksum = source.checksum;
        self.stones = source.stones;
        self.captures.clone_from(&source.captures);
        self.history_start = source.history_start;
        self.marks.clone_from(&source.marks);
        self.mark_id = source.mark_id;
    }

    /// Record the current move as the start of "history"; older stones are
    /// reported by [`Position::is_prehistoric`].
    pub fn mark_history(&mut self) {
        self.history_start = self.move_number;
    }

    /// Whether the stone at `xy` was placed before the last [`Position::mark_history`].
    #[inline]
    pub fn is_prehistoric(&self, xy: usize) -> bool {
        self.stone_age[xy] < self.history_start
    }

    pub fn push_priority_move(&mut self, mv: PriorityMove) {
        self.priority_moves.push(mv);
    }

    pub fn clear_priority_moves(&mut self) {
        self.priority_moves.clear();
    }

    // =========================================================================
    // Legality
    // =========================================================================

    /// Whether the side to move may play at `xy`.
    ///
    /// Pass is always legal; anything off the board is not.
    pub fn is_legal(&self, xy: usize) -> bool {
        self.check_move(xy).is_ok()
    }

    /// Like [`Position::is_legal`] but reports why a move is refused.
    pub fn check_move(&self, xy: usize) -> Result<(), MoveError> {
        if xy == PASS_MOVE {
            return Ok(());
        }
        if !self.geo.is_on_board(xy) {
            return Err(MoveError::OffBoard(xy));
        }
        if self.board[xy] != PointValue::Empty {
            return Err(MoveError::Occupied);
        }
        // An empty neighbour is a liberty.
        if self.neighbours[xy] < 4 {
            return Ok(());
        }
        if xy == self.ko_point && self.other_neighbours()[xy] == 4 {
            return Err(MoveError::Ko);
        }

        let own = self.to_move.stone();
        let neighbours = self.geo.neighbours(xy);
        for (i, &n) in neighbours.iter().enumerate() {
            let value = self.board[n];
            if !value.is_stone() {
                continue;
            }
            let group = self.chain[n];
            // Each group is judged once, at its first adjacent stone.
            if neighbours[..i].iter().any(|&m| self.chain[m] == group && self.board[m].is_stone()) {
                continue;
            }
            let remaining = self.liberties_without(group, xy);
            if value == own {
                if remaining > 0 {
                    return Ok(());
                }
            } else if remaining == 0 {
                return Ok(());
            }
        }
        Err(MoveError::Suicide)
    }

    /// Liberties `group` keeps once the empty point `xy` next to it is filled.
    fn liberties_without(&self, group: usize, xy: usize) -> i32 {
        match self.mode {
            LibertyMode::Exact => self.liberties[group] - 1,
            LibertyMode::Pseudo => {
                let adjacent = self
                    .geo
                    .neighbours(xy)
                    .iter()
                    .filter(|&&n| self.board[n].is_stone() && self.chain[n] == group)
                    .count() as i32;
                self.liberties[group] - adjacent
            }
        }
    }

    // =========================================================================
    // Playing moves
    // =========================================================================

    /// Play a move for the side to move after checking legality.
    pub fn play(&mut self, xy: usize) -> Result<(), MoveError> {
        self.check_move(xy)?;
        self.play_legal(xy);
        Ok(())
    }

    /// Pass for the side to move.
    pub fn pass(&mut self) {
        self.play_legal(PASS_MOVE);
    }

    /// Play a move already known to be legal.
    pub fn play_legal(&mut self, xy: usize) {
        debug_assert!(self.is_legal(xy), "illegal move {xy} reached play_legal");

        self.captures.clear();
        self.ko_point = 0;

        if xy == PASS_MOVE {
            self.passes += 1;
            self.finish_move(xy);
            return;
        }
        self.passes = 0;

        let geo = self.geo;
        let color = self.to_move;
        let opponent = color.opponent();
        let surrounded = self.color_neighbours[opponent.index()][xy] == 4;

        self.place_stone(xy, color);

        // The first adjacent group absorbs the new stone; later ones are
        // relabelled into it.
        let mut joined = None;
        let mut merged = false;
        for n in geo.neighbours(xy) {
            if self.board[n] != color.stone() || self.chain[n] == self.chain[xy] {
                continue;
            }
            match joined {
                None => {
                    joined = Some(self.chain[n]);
                    self.merge_groups(self.chain[n], xy);
                }
                Some(group) => {
                    self.merge_groups(group, self.chain[n]);
                    merged = true;
                }
            }
        }

        if self.mode == LibertyMode::Exact {
            let group = self.chain[xy];
            let libs = if merged {
                self.recount_liberties(group)
            } else if joined.is_some() {
                // Single-stone extension: xy was one of the group's liberties.
                self.liberties[group] - 1 + self.new_liberties(xy, group)
            } else {
                self.empty_neighbour_count(xy)
            };
            self.liberties[group] = libs;
        }

        for n in geo.neighbours(xy) {
            if self.board[n] == opponent.stone() && self.liberties[self.chain[n]] == 0 {
                self.remove_group(self.chain[n], opponent);
            }
        }

        if self.captures.len() == 1 && surrounded {
            self.ko_point = self.captures[0];
        }

        debug_assert!(self.liberties[self.chain[xy]] > 0, "group at {xy} left without liberties");
        self.finish_move(xy);
    }

    fn finish_move(&mut self, xy: usize) {
        self.move_stack.push(xy);
        self.checksum_stack.push(self.checksum);
        self.move_number += 1;
        self.to_move = self.to_move.opponent();
    }

    /// Put a lone stone on the board and update everything around it except
    /// own-group liberties in exact mode.
    fn place_stone(&mut self, xy: usize, color: Color) {
        let geo = self.geo;
        let c = color.index();

        self.board[xy] = color.stone();
        self.empty_points.remove(xy);
        self.checksum ^= self.zobrist.get_hash(color, xy);
        self.stones[c] += 1;
        self.stone_age[xy] = self.move_number;
        self.chain[xy] = xy;
        self.chain_next[xy] = xy;

        for n in geo.neighbours(xy) {
            self.neighbours[n] += 1;
            self.color_neighbours[c][n] += 1;
        }
        for d in geo.diagonals(xy) {
            self.color_diagonals[c][d] += 1;
        }

        match self.mode {
            LibertyMode::Exact => {
                let neighbours = geo.neighbours(xy);
                for (i, &n) in neighbours.iter().enumerate() {
                    if self.board[n] != color.opponent().stone() {
                        continue;
                    }
                    let group = self.chain[n];
                    if !neighbours[..i]
                        .iter()
                        .any(|&m| self.board[m].is_stone() && self.chain[m] == group)
                    {
                        self.liberties[group] -= 1;
                    }
                }
            }
            LibertyMode::Pseudo => {
                self.liberties[xy] = self.empty_neighbour_count(xy);
                for n in geo.neighbours(xy) {
                    if self.board[n].is_stone() {
                        self.liberties[self.chain[n]] -= 1;
                    }
                }
            }
        }
    }

    /// Relabel the group `absorbed` into `keep` and splice the two lists.
    fn merge_groups(&mut self, keep: usize, absorbed: usize) {
        debug_assert_ne!(keep, absorbed);
        let mut s = absorbed;
        loop {
            self.chain[s] = keep;
            s = self.chain_next[s];
            if s == absorbed {
                break;
            }
        }
        self.chain_next.swap(keep, absorbed);
        if self.mode == LibertyMode::Pseudo {
            self.liberties[keep] += self.liberties[absorbed];
        }
    }

    /// Remove every stone of `group` and credit the freed points to the
    /// surrounding groups.
    fn remove_group(&mut self, group: usize, color: Color) {
        let geo = self.geo;
        let first = self.captures.len();

        let mut s = group;
        loop {
            let next = self.chain_next[s];
            self.remove_stone(s, color);
            self.captures.push(s);
            s = next;
            if s == group {
                break;
            }
        }

        for i in first..self.captures.len() {
            let xy = self.captures[i];
            let neighbours = geo.neighbours(xy);
            for (j, &n) in neighbours.iter().enumerate() {
                if !self.board[n].is_stone() {
                    continue;
                }
                let owner = self.chain[n];
                let counted = self.mode == LibertyMode::Exact
                    && neighbours[..j]
                        .iter()
                        .any(|&m| self.board[m].is_stone() && self.chain[m] == owner);
                if !counted {
                    self.liberties[owner] += 1;
                }
            }
        }
    }

    fn remove_stone(&mut self, xy: usize, color: Color) {
        debug_assert_eq!(self.board[xy], color.stone());
        let geo = self.geo;
        let c = color.index();

        self.board[xy] = PointValue::Empty;
        self.empty_points.add(xy);
        self.checksum ^= self.zobrist.get_hash(color, xy);
        self.stones[c] -= 1;
        self.chain[xy] = 0;
        self.chain_next[xy] = xy;

        for n in geo.neighbours(xy) {
            self.neighbours[n] -= 1;
            self.color_neighbours[c][n] -= 1;
        }
        for d in geo.diagonals(xy) {
            self.color_diagonals[c][d] -= 1;
        }
    }

    fn empty_neighbour_count(&self, xy: usize) -> i32 {
        4 - self.neighbours[xy] as i32
    }

    /// Empty neighbours of `xy` not already adjacent to `group`.
    fn new_liberties(&self, xy: usize, group: usize) -> i32 {
        let geo = self.geo;
        geo.neighbours(xy)
            .into_iter()
            .filter(|&e| {
                self.board[e] == PointValue::Empty
                    && !geo
                        .neighbours(e)
                        .iter()
                        .any(|&m| m != xy && self.board[m].is_stone() && self.chain[m] == group)
            })
            .count() as i32
    }

    /// Exact liberty count of `group`, walking its stones.
    fn recount_liberties(&mut self, group: usize) -> i32 {
        let geo = self.geo;
        self.mark_id = self.mark_id.wrapping_add(1);
        if self.mark_id == 0 {
            self.marks.fill(0);
            self.mark_id = 1;
        }
        let mark = self.mark_id;

        let mut count = 0;
        let mut s = group;
        loop {
            for n in geo.neighbours(s) {
                if self.board[n] == PointValue::Empty && self.marks[n] != mark {
                    self.marks[n] = mark;
                    count += 1;
                }
            }
            s = self.chain_next[s];
            if s == group {
                break;
            }
        }
        count
    }

    // =========================================================================
    // Queries for heuristics
    // =========================================================================

    /// Iterate over the stones of the group containing `xy`.
    pub fn group_stones(&self, xy: usize) -> GroupStones<'_> {
        GroupStones {
            chain_next: &self.chain_next,
            start: xy,
            current: Some(xy),
        }
    }

    /// Number of stones in the group containing `xy`.
    pub fn group_size(&self, xy: usize) -> usize {
        self.group_stones(xy).count()
    }

    /// Collect up to `limit` distinct liberties of the group containing `xy`
    /// into `out`. Returns how many were found.
    pub fn collect_liberties(&self, xy: usize, limit: usize, out: &mut Vec<usize>) -> usize {
        out.clear();
        for s in self.group_stones(xy) {
            for n in self.geo.neighbours(s) {
                if self.board[n] == PointValue::Empty && !out.contains(&n) {
                    out.push(n);
                    if out.len() >= limit {
                        return out.len();
                    }
                }
            }
        }
        out.len()
    }

    /// The only liberty of the group containing `xy`, if it is in atari.
    pub fn single_liberty(&self, xy: usize) -> Option<usize> {
        if self.mode == LibertyMode::Exact && self.group_liberties(xy) != 1 {
            return None;
        }
        let mut found = None;
        for s in self.group_stones(xy) {
            for n in self.geo.neighbours(s) {
                if self.board[n] != PointValue::Empty {
                    continue;
                }
                match found {
                    None => found = Some(n),
                    Some(f) if f != n => return None,
                    _ => {}
                }
            }
        }
        found
    }

    /// Liberties, up to `limit`, of the group `color` would form by playing
    /// at `xy`. A move that captures is reported as having `limit`.
    ///
    /// `out` is scratch space and holds the liberties found.
    pub fn liberties_after(
        &self,
        xy: usize,
        color: Color,
        limit: usize,
        out: &mut Vec<usize>,
    ) -> usize {
        out.clear();
        let neighbours = self.geo.neighbours(xy);
        for &n in &neighbours {
            if self.board[n] == PointValue::Empty && !out.contains(&n) {
                out.push(n);
            }
        }
        if out.len() >= limit {
            return limit;
        }

        for &n in &neighbours {
            match self.board[n].color() {
                Some(c) if c == color => {
                    for s in self.group_stones(n) {
                        for m in self.geo.neighbours(s) {
                            if m != xy && self.board[m] == PointValue::Empty && !out.contains(&m) {
                                out.push(m);
                                if out.len() >= limit {
                                    return limit;
                                }
                            }
                        }
                    }
                }
                Some(_) => {
                    if self.single_liberty(n).is_some() {
                        return limit;
                    }
                }
                None => {}
            }
        }
        out.len()
    }

    /// Whether `xy` is an eye of `color`: every orthogonal neighbour is an
    /// own stone or border, and at most one diagonal is an opposing stone in
    /// the centre, none on the edge.
    pub fn is_eye(&self, xy: usize, color: Color) -> bool {
        if self.board[xy] != PointValue::Empty || self.color_neighbours[color.index()][xy] != 4 {
            return false;
        }
        let edges = self
            .geo
            .diagonals(xy)
            .iter()
            .filter(|&&d| self.board[d] == PointValue::Edge)
            .count();
        let opposing = self.color_diagonals[color.opponent().index()][xy] as usize - edges;
        let tolerance = if edges > 0 { 0 } else { 1 };
        opposing <= tolerance
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Recompute every derived structure from the board and compare.
    pub fn verify(&self) -> Result<(), Inconsistency> {
        let geo = self.geo;

        for xy in 0..geo.len {
            if !geo.is_on_board(xy) && self.board[xy] != PointValue::Edge {
                return Err(Inconsistency::Border(xy));
            }
        }

        let mut stones = [0usize; 2];
        let mut checksum = 0u64;
        let mut empties = 0;
        for xy in geo.points() {
            let value = self.board[xy];
            match value.color() {
                None => {
                    if value != PointValue::Empty || !self.empty_points.contains(xy) {
                        return Err(Inconsistency::EmptySet(xy));
                    }
                    empties += 1;
                }
                Some(color) => {
                    if self.empty_points.contains(xy) {
                        return Err(Inconsistency::EmptySet(xy));
                    }
                    stones[color.index()] += 1;
                    checksum ^= self.zobrist.get_hash(color, xy);
                    let group = self.chain[xy];
                    if self.board[group] != value || self.chain[group] != group {
                        return Err(Inconsistency::Group(xy));
                    }
                }
            }

            let mut nb = [0u8; 3];
            for n in geo.neighbours(xy) {
                match self.board[n] {
                    PointValue::Black => nb[0] += 1,
                    PointValue::White => nb[1] += 1,
                    PointValue::Edge => nb[2] += 1,
                    PointValue::Empty => {}
                }
            }
            let mut diag = [0u8; 3];
            for d in geo.diagonals(xy) {
                match self.board[d] {
                    PointValue::Black => diag[0] += 1,
                    PointValue::White => diag[1] += 1,
                    PointValue::Edge => diag[2] += 1,
                    PointValue::Empty => {}
                }
            }
            if self.neighbours[xy] != nb[0] + nb[1] + nb[2]
                || self.color_neighbours[0][xy] != nb[0] + nb[2]
                || self.color_neighbours[1][xy] != nb[1] + nb[2]
                || self.color_diagonals[0][xy] != diag[0] + diag[2]
                || self.color_diagonals[1][xy] != diag[1] + diag[2]
            {
                return Err(Inconsistency::Neighbours(xy));
            }
        }

        if empties != self.empty_points.len() {
            return Err(Inconsistency::EmptySet(0));
        }
        if stones != self.stones {
            return Err(Inconsistency::StoneCount);
        }
        if checksum != self.checksum {
            return Err(Inconsistency::Checksum {
                tracked: self.checksum,
                counted: checksum,
            });
        }

        self.verify_groups()
    }

    fn verify_groups(&self) -> Result<(), Inconsistency> {
        let geo = self.geo;
        let mut seen = vec![false; geo.len];
        let mut liberty = vec![false; geo.len];
        let mut stack = Vec::new();

        for g in geo.points() {
            if !self.board[g].is_stone() || self.chain[g] != g {
                continue;
            }
            let value = self.board[g];

            // Members reachable through the list.
            let mut members = 0;
            for s in self.group_stones(g) {
                if self.board[s] != value || self.chain[s] != g || members > geo.area() {
                    return Err(Inconsistency::Group(s));
                }
                members += 1;
            }

            // Members reachable on the board, with their liberties.
            let mut connected = 0;
            let mut true_libs = 0;
            let mut pseudo_libs = 0;
            let mut touched = Vec::new();
            stack.push(g);
            seen[g] = true;
            while let Some(s) = stack.pop() {
                if self.chain[s] != g {
                    return Err(Inconsistency::Group(s));
                }
                connected += 1;
                for n in geo.neighbours(s) {
                    match self.board[n] {
                        PointValue::Empty => {
                            pseudo_libs += 1;
                            if !liberty[n] {
                                liberty[n] = true;
                                touched.push(n);
                                true_libs += 1;
                            }
                        }
                        v if v == value && !seen[n] => {
                            seen[n] = true;
                            stack.push(n);
                        }
                        _ => {}
                    }
                }
            }
            for n in touched {
                liberty[n] = false;
            }

            if connected != members {
                return Err(Inconsistency::Group(g));
            }
            if true_libs == 0 {
                return Err(Inconsistency::Dead(g));
            }
            let expected = match self.mode {
                LibertyMode::Exact => true_libs,
                LibertyMode::Pseudo => pseudo_libs,
            };
            if self.liberties[g] != expected {
                return Err(Inconsistency::Liberties {
                    xy: g,
                    tracked: self.liberties[g],
                    counted: expected,
                });
            }
        }
        Ok(())
    }
}

/// Iterator over the stones of one group, following `chain_next`.
pub struct GroupStones<'a> {
    chain_next: &'a [usize],
    start: usize,
    current: Option<usize>,
}

impl Iterator for GroupStones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let xy = self.current?;
        let next = self.chain_next[xy];
        self.current = (next != self.start).then_some(next);
        Some(xy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geo = &self.geo;
        write!(f, "   ")?;
        for x in 1..=geo.size {
            let mut c = (b'@' + x as u8) as char;
            if c >= 'I' {
                c = (c as u8 + 1) as char;
            }
            write!(f, " {c}")?;
        }
        writeln!(f)?;
        for y in 1..=geo.size {
            write!(f, "{:>3}", geo.size + 1 - y)?;
            for x in 1..=geo.size {
                let xy = geo.xy(x, y);
                let ch = if xy == self.ko_point {
                    '*'
                } else {
                    self.board[xy].symbol()
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(size: usize, mode: LibertyMode, moves: &[&str]) -> Position {
        let mut pos = Position::with_mode(size, mode);
        for mv in moves {
            let xy = pos.geometry().parse_coord(mv).expect("bad coordinate");
            pos.play(xy).unwrap_or_else(|e| panic!("{mv}: {e}"));
            pos.verify().unwrap_or_else(|e| panic!("after {mv}: {e}"));
        }
        pos
    }

    fn at(pos: &Position, s: &str) -> usize {
        pos.geometry().parse_coord(s).unwrap()
    }

    #[test]
    fn test_empty_position() {
        let pos = Position::new(9);
        assert_eq!(pos.empty_points.len(), 81);
        assert_eq!(pos.move_number, 0);
        assert_eq!(pos.ko_point, 0);
        assert_eq!(pos.to_move, Color::Black);
        assert_eq!(pos.checksum(), 0);
        pos.verify().unwrap();
    }

    #[test]
    fn test_edge_seeded_neighbour_counts() {
        let pos = Position::new(9);
        let corner = at(&pos, "A1");
        let side = at(&pos, "E1");
        let center = at(&pos, "E5");
        assert_eq!(pos.neighbours[corner], 2);
        assert_eq!(pos.neighbours[side], 1);
        assert_eq!(pos.neighbours[center], 0);
        assert_eq!(pos.color_neighbours[0][corner], 2);
        assert_eq!(pos.color_neighbours[1][corner], 2);
        assert_eq!(pos.color_diagonals[0][corner], 3);
    }

    #[test]
    fn test_single_stone_liberties() {
        for mode in [LibertyMode::Exact, LibertyMode::Pseudo] {
            let pos = setup(9, mode, &["D4", "A1"]);
            assert_eq!(pos.group_liberties(at(&pos, "D4")), 4);
            assert_eq!(pos.group_liberties(at(&pos, "A1")), 2);
        }
    }

    #[test]
    fn test_side_to_move_toggles_on_pass() {
        let mut pos = Position::new(9);
        pos.pass();
        assert_eq!(pos.to_move, Color::White);
        assert_eq!(pos.passes, 1);
        assert_eq!(pos.last_move(), Some(PASS_MOVE));
        pos.play(at(&pos, "C3")).unwrap();
        assert_eq!(pos.passes, 0);
        assert_eq!(pos.board[at(&pos, "C3")], PointValue::White);
    }

    #[test]
    fn test_occupied_and_off_board() {
        let mut pos = setup(9, LibertyMode::Exact, &["D4"]);
        assert_eq!(pos.play(at(&pos, "D4")), Err(MoveError::Occupied));
        assert_eq!(pos.play(20), Err(MoveError::OffBoard(20)));
        assert!(!pos.is_legal(10_000));
        assert!(pos.is_legal(PASS_MOVE));
    }

    #[test]
    fn test_suicide_refused() {
        for mode in [LibertyMode::Exact, LibertyMode::Pseudo] {
            let mut pos = setup(9, mode, &["A2", "H8", "B1"]);
            let a1 = at(&pos, "A1");
            assert_eq!(pos.check_move(a1), Err(MoveError::Suicide));
            assert_eq!(pos.play(a1), Err(MoveError::Suicide));
        }
    }

    #[test]
    fn test_capture_in_corner() {
        for mode in [LibertyMode::Exact, LibertyMode::Pseudo] {
            let pos = setup(9, mode, &["B2", "A1", "A2", "H8", "B1"]);
            assert_eq!(pos.board[at(&pos, "A1")], PointValue::Empty);
            assert_eq!(pos.last_captures(), &[at(&pos, "A1")]);
            assert_eq!(pos.stones(Color::White), 1);
            // Not a ko: B1 had a black neighbour.
            assert_eq!(pos.ko_point, 0);
        }
    }

    #[test]
    fn test_pseudo_overcounts_shared_liberty() {
        // Black C3 D4 share liberties C4 and D3.
        let pos = setup(9, LibertyMode::Pseudo, &["C3", "J9", "D4", "J8", "D3"]);
        let exact = setup(9, LibertyMode::Exact, &["C3", "J9", "D4", "J8", "D3"]);
        let d3 = at(&pos, "D3");
        assert_eq!(exact.group_liberties(d3), 7);
        assert!(pos.group_liberties(d3) > exact.group_liberties(d3));
    }

    #[test]
    fn test_group_stones_walks_whole_group() {
        let pos = setup(9, LibertyMode::Exact, &["C3", "J9", "E3", "J8", "D3"]);
        let mut stones: Vec<_> = pos.group_stones(at(&pos, "E3")).collect();
        stones.sort_unstable();
        let mut expected = vec![at(&pos, "C3"), at(&pos, "D3"), at(&pos, "E3")];
        expected.sort_unstable();
        assert_eq!(stones, expected);
    }

    #[test]
    fn test_single_liberty_and_liberties_after() {
        let pos = setup(9, LibertyMode::Pseudo, &["D4", "D5", "H8", "C4", "H7", "E4"]);
        // Black D4 has only D3 left.
        let d4 = at(&pos, "D4");
        assert_eq!(pos.single_liberty(d4), Some(at(&pos, "D3")));
        let mut buf = Vec::new();
        assert_eq!(pos.liberties_after(at(&pos, "D3"), Color::Black, 4, &mut buf), 3);
    }

    #[test]
    fn test_collect_liberties_is_distinct() {
        for mode in [LibertyMode::Exact, LibertyMode::Pseudo] {
            let pos = setup(9, mode, &["C3", "J9", "D4", "J8", "D3"]);
            let mut libs = Vec::new();
            assert_eq!(pos.collect_liberties(at(&pos, "C3"), 20, &mut libs), 7);
            assert!(libs.contains(&at(&pos, "C4")));
            assert_eq!(pos.collect_liberties(at(&pos, "C3"), 3, &mut libs), 3);
        }
    }

    #[test]
    fn test_own_and_other_views_swap() {
        let mut pos = setup(9, LibertyMode::Exact, &["E5"]);
        let e4 = at(&pos, "E4");
        let f4 = at(&pos, "F4");
        // White to move: the black stone is "other".
        assert_eq!(pos.other_neighbours()[e4], 1);
        assert_eq!(pos.own_neighbours()[e4], 0);
        assert_eq!(pos.other_diagonals()[f4], 1);
        pos.pass();
        assert_eq!(pos.own_neighbours()[e4], 1);
        assert_eq!(pos.own_diagonals()[f4], 1);
        assert_eq!(pos.other_diagonals()[f4], 0);
    }

    #[test]
    fn test_priority_moves_stack() {
        let mut pos = Position::new(9);
        let mv = PriorityMove {
            xy: at(&pos, "C3"),
            urgency: 0.8,
            visits: 10,
            wins: 6,
        };
        pos.push_priority_move(mv);
        let copy = pos.clone();
        assert_eq!(copy.priority_moves, vec![mv]);
        pos.clear_priority_moves();
        assert!(pos.priority_moves.is_empty());
        assert_ne!(pos, copy);
    }

    #[test]
    fn test_is_eye() {
        let pos = setup(9, LibertyMode::Exact, &["A2", "J9", "B1", "J8", "B2"]);
        let a1 = at(&pos, "A1");
        assert!(pos.is_eye(a1, Color::Black));
        assert!(!pos.is_eye(a1, Color::White));
        assert!(!pos.is_eye(at(&pos, "E5"), Color::Black));
    }

    #[test]
    fn test_copy_data_from_equals_source() {
        let src = setup(9, LibertyMode::Exact, &["D4", "E4", "C5", "E5", "D6"]);
        let mut dst = Position::new(9);
        dst.copy_data_from(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.checksum(), src.checksum());
        let cloned = src.clone();
        assert_eq!(cloned, src);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut pos = setup(9, LibertyMode::Exact, &["D4"]);
        pos.komi = 0.5;
        pos.resize(13);
        assert_eq!(pos.size(), 13);
        assert_eq!(pos.board.len(), 14 * 15 + 1);
        assert_eq!(pos.empty_points.len(), 169);
        assert_eq!(pos.komi, 0.5);
        pos.verify().unwrap();
    }

    #[test]
    fn test_display_marks_ko() {
        let mut pos = Position::new(5);
        pos.play(pos.geometry().parse_coord("A1").unwrap()).unwrap();
        let text = pos.to_string();
        assert!(text.contains('X'));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_verify_reports_corruption() {
        for mode in [LibertyMode::Exact, LibertyMode::Pseudo] {
            let pos = setup(9, mode, &["C3", "J9", "D3", "J8", "E3"]);
            let group = pos.chain[at(&pos, "D3")];
            assert_eq!(pos.group_size(group), 3);

            let mut bad = pos.clone();
            bad.liberties[group] += 1;
            assert!(matches!(
                bad.verify(),
                Err(Inconsistency::Liberties { xy, .. }) if xy == group
            ));

            let mut bad = pos.clone();
            bad.chain_next[group] = group;
            assert_eq!(bad.verify(), Err(Inconsistency::Group(group)));

            let mut bad = pos.clone();
            let c4 = at(&pos, "C4");
            bad.neighbours[c4] += 1;
            assert_eq!(bad.verify(), Err(Inconsistency::Neighbours(c4)));

            let mut bad = pos.clone();
            let e5 = at(&pos, "E5");
            bad.empty_points.remove(e5);
            assert_eq!(bad.verify(), Err(Inconsistency::EmptySet(e5)));

            let mut bad = pos.clone();
            bad.checksum ^= 1;
            assert!(matches!(bad.verify(), Err(Inconsistency::Checksum { .. })));

            pos.verify().unwrap();
        }
    }
}
