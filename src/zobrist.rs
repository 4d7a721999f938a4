use fastrand::Rng;

use crate::board::Color;

/// Random keys for the incremental positional checksum.
///
/// The table is derived from a fixed seed and the array length, so two
/// positions of the same size always agree on checksums whether or not they
/// share the same table instance.
#[derive(Clone, PartialEq, Debug)]
pub struct Zobrist {
    hashes: Vec<u64>,
}

impl Zobrist {
    const SEED: u64 = 0x9e37_79b9_7f4a_7c15;

    pub fn new(length: usize) -> Zobrist {
        let mut rng = Rng::with_seed(Self::SEED ^ length as u64);
        Zobrist {
            hashes: std::iter::repeat_with(|| rng.u64(..)).take(length * 2).collect(),
        }
    }

    #[inline]
    pub fn get_hash(&self, color: Color, xy: usize) -> u64 {
        self.hashes[xy * 2 + color.index()]
    }
}
