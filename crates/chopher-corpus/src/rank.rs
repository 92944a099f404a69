//! In-place rank permutation.
//!
//! The permutation is derived from the buffer itself. A counting sort assigns
//! every position its stable sorted slot
//!
//! ```text
//! next(k) = offset[buffer[k]] + rank[k]
//! ```
//!
//! where `offset[v]` is the number of bytes strictly smaller than `v` and
//! `rank[k]` is how many times `buffer[k]` occurred before position `k`.
//! `next` is a bijection on positions. [`invert`] decomposes it into disjoint
//! cycles and writes each cycle's bytes into the buffer from the last index
//! backward, so no sorted copy is ever materialised.
//!
//! This is the LF-walk of an inverse Burrows-Wheeler transform without a
//! primary index: it scrambles structure deterministically but is not a codec.

/// Number of distinct byte values.
const BYTE_VALUES: usize = 256;

/// Counting-sort bookkeeping for one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    /// Per byte value, the number of positions holding a smaller value.
    offsets: [usize; BYTE_VALUES],
    /// Per position, the occurrence rank of its byte among earlier positions.
    ranks: Vec<usize>,
}

impl RankTable {
    /// Builds the offset and occurrence-rank tables for `buffer`.
    pub fn build(buffer: &[u8]) -> Self {
        let mut counts = [0usize; BYTE_VALUES];
        let mut ranks = Vec::with_capacity(buffer.len());

        for &value in buffer {
            let count = &mut counts[value as usize];
            ranks.push(*count);
            *count += 1;
        }

        // Exclusive prefix sum turns counts into bucket offsets.
        let mut offsets = [0usize; BYTE_VALUES];
        let mut sum = 0;
        for (offset, count) in offsets.iter_mut().zip(counts) {
            *offset = sum;
            sum += count;
        }

        Self { offsets, ranks }
    }

    /// Bucket offset for a byte value.
    pub fn offset(&self, value: u8) -> usize {
        self.offsets[value as usize]
    }

    /// Occurrence rank of the byte at `position`.
    pub fn rank(&self, position: usize) -> usize {
        self.ranks[position]
    }

    /// Occurrence ranks in input order.
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Stable sorted slot of `position`, given the byte stored there.
    pub fn next(&self, position: usize, value: u8) -> usize {
        self.offset(value) + self.rank(position)
    }

    /// Number of positions covered by the table.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns true if the table covers no positions.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Rewrites `buffer` in place with its rank permutation.
///
/// The multiset of byte values is preserved. Empty buffers are left untouched,
/// and a buffer of one repeated value maps to itself.
pub fn invert(buffer: &mut [u8]) {
    if buffer.is_empty() {
        return;
    }

    let input = buffer.to_vec();
    let table = RankTable::build(&input);

    // `None` marks a position whose rank has been consumed by a cycle.
    let mut pending: Vec<Option<usize>> = table.ranks().iter().copied().map(Some).collect();
    let mut cursor = input.len();

    for start in 0..input.len() {
        let mut position = start;
        while let Some(rank) = pending[position].take() {
            let value = input[position];
            cursor -= 1;
            buffer[cursor] = value;
            position = table.offset(value) + rank;
        }
    }

    debug_assert_eq!(cursor, 0, "every output slot is written exactly once");
}
