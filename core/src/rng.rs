//! Seeded xorshift stream shared by every random decision in a run.

use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;

const FALLBACK_STATE: u32 = 0x9e37_79b9;
const BASIS_POINTS: u32 = 10_000;

/// Deterministic 32-bit xorshift generator.
///
/// A simulation owns exactly one instance. Callers receive it by mutable
/// reference, so the order of draws is fixed by the tick loop rather than by
/// any ambient state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimRng {
    state: u32,
}

impl SimRng {
    /// Seeds the stream from a 64-bit run seed by folding its two halves.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self::from_state((seed as u32) ^ ((seed >> 32) as u32))
    }

    /// Restores a stream from a previously captured cursor.
    ///
    /// Xorshift has no zero state, so zero is replaced with a fixed constant.
    #[must_use]
    pub const fn from_state(state: u32) -> Self {
        let state = if state == 0 { FALLBACK_STATE } else { state };
        Self { state }
    }

    /// Current cursor of the stream.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Advances the stream and returns the next 32-bit value.
    pub fn next_value(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Draws a value in `0..bound`. A zero bound yields zero without drawing.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_value() % bound
    }

    /// Draws a value in `min..=max`. Reversed bounds are swapped.
    pub fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let span = u64::from(high.abs_diff(low)) + 1;
        let offset = u64::from(self.next_value()) % span;
        (i64::from(low) + offset as i64) as i32
    }

    /// Rolls a chance expressed in basis points. Always consumes one draw.
    pub fn chance_bps(&mut self, bps: u32) -> bool {
        self.below(BASIS_POINTS) < bps
    }

    /// Draws a fixed-point value in `[0, 1)`.
    pub fn next_fixed_unit(&mut self) -> Fixed {
        Fixed::from_raw((self.next_value() >> 16) as i32)
    }

    /// Picks an index into a collection of `len` elements.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        usize::try_from(self.below(bound)).ok()
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.next_value()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_value());
        let low = u64::from(self.next_value());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_value().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SimRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_state(u32::from_le_bytes(seed))
    }
}
