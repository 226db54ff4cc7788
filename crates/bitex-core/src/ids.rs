//! Request / order id generation.
//!
//! Ids are bounded random integers. Nothing checks for collisions or
//! remembers ids across calls; the venue correlates on whatever it gets.

use rand::Rng;

/// Source of request, subscription and client order ids.
pub trait IdGenerator: Send {
    /// Next id in `[0, bound)`. A zero bound behaves as `1`.
    fn next_id(&mut self, bound: u64) -> u64;

    /// Correlation value in `[0, 1)` for test requests.
    fn next_correlation(&mut self) -> f64 {
        const RESOLUTION: u64 = 1 << 53;
        self.next_id(RESOLUTION) as f64 / RESOLUTION as f64
    }
}

/// Thread-local RNG backed generator. This is what the client uses
/// unless told otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self, bound: u64) -> u64 {
        rand::rng().random_range(0..bound.max(1))
    }

    fn next_correlation(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when it runs out.
///
/// Each value is reduced modulo the requested bound so the result is
/// always in range.
#[derive(Debug, Clone)]
pub struct SequenceIdGenerator {
    values: Vec<u64>,
    pos: usize,
}

impl SequenceIdGenerator {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&mut self, bound: u64) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % bound.max(1)
    }
}
