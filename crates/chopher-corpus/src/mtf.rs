//! Move-to-front decoding over an array-backed recency list.
//!
//! The list holds all 256 byte values. It is stored as a `next` array indexed
//! by byte value plus the value at the front, so splicing a node to the front
//! is O(1) and nothing is allocated per node.
//!
//! Decoding an index walks `index` links from the front and returns the value
//! found there. A nonzero index then moves that value to the front.

/// Number of symbols in the recency list.
const SYMBOLS: usize = 256;

/// Move-to-front decoder state.
#[derive(Debug, Clone)]
pub struct MoveToFrontDecoder {
    /// Successor of each value in recency order.
    next: [u8; SYMBOLS],
    /// Most recently used value.
    front: u8,
}

impl Default for MoveToFrontDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveToFrontDecoder {
    /// Creates a decoder with the list in ascending order: 0, 1, ..., 255.
    pub fn new() -> Self {
        // The tail links back to 0; it is never followed because an index
        // walks at most 255 links.
        let next = std::array::from_fn(|value| (value as u8).wrapping_add(1));
        Self { next, front: 0 }
    }

    /// Value currently at the front of the list.
    pub fn front(&self) -> u8 {
        self.front
    }

    /// Decodes one index into a byte value.
    pub fn decode(&mut self, index: u8) -> u8 {
        let mut previous = self.front;
        let mut current = self.front;
        for _ in 0..index {
            previous = current;
            current = self.next[current as usize];
        }

        if index != 0 {
            self.next[previous as usize] = self.next[current as usize];
            self.next[current as usize] = self.front;
            self.front = current;
        }

        current
    }

    /// Decodes every index in `symbols`, replacing each with its value.
    pub fn decode_in_place(&mut self, symbols: &mut [u8]) {
        for symbol in symbols.iter_mut() {
            *symbol = self.decode(*symbol);
        }
    }

    /// Returns the first `n` values in recency order.
    pub fn recency(&self, n: usize) -> Vec<u8> {
        let mut values = Vec::with_capacity(n.min(SYMBOLS));
        let mut current = self.front;
        for _ in 0..n.min(SYMBOLS) {
            values.push(current);
            current = self.next[current as usize];
        }
        values
    }
}
