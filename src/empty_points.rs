//! Set of empty points with O(1) insert, remove and random access.
//!
//! Points live in a dense array; a reverse index records where each point
//! sits so removal can swap the last element into the hole.

use fastrand::Rng;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EmptyPoints {
    points: Vec<usize>,
    index: Vec<usize>,
}

impl EmptyPoints {
    /// Sentinel in the reverse index for points not in the set.
    const ABSENT: usize = usize::MAX;

    /// An empty set able to hold indices below `len`.
    pub fn new(len: usize) -> Self {
        EmptyPoints {
            points: Vec::with_capacity(len),
            index: vec![Self::ABSENT; len],
        }
    }

    pub fn clear(&mut self) {
        for &xy in &self.points {
            self.index[xy] = Self::ABSENT;
        }
        self.points.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn contains(&self, xy: usize) -> bool {
        self.index.get(xy).is_some_and(|&i| i != Self::ABSENT)
    }

    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.points[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().copied()
    }

    #[inline]
    pub fn add(&mut self, xy: usize) {
        debug_assert!(!self.contains(xy), "point {xy} already in empty set");
        self.index[xy] = self.points.len();
        self.points.push(xy);
    }

    #[inline]
    pub fn remove(&mut self, xy: usize) {
        debug_assert!(self.contains(xy), "point {xy} not in empty set");
        let i = self.index[xy];
        let last = self.points.len() - 1;
        let moved = self.points[last];
        self.points[i] = moved;
        self.index[moved] = i;
        self.points.pop();
        self.index[xy] = Self::ABSENT;
    }

    /// A uniformly chosen member, or `None` if the set is empty.
    pub fn random(&self, rng: &mut Rng) -> Option<usize> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.points[rng.usize(..self.points.len())])
        }
    }
}
