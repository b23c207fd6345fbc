//! Deterministic pseudo-random stream.
//!
//! A mulberry32 generator: 32 bits of state advanced by a fixed
//! multiply-xor-shift transform. The sequence is a pure function of the seed
//! and the number of draws taken, so two streams built from the same seed are
//! bit-identical. Every agent owns one stream; trait generation and the
//! market-neutral yield model draw from it in a fixed order.

use rand::RngCore;

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicStream {
    state: u32,
    draws: u64,
}

impl DeterministicStream {
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed,
            draws: 0,
        }
    }

    /// Next raw 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        self.draws += 1;
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Next draw in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_raw() as f64 / TWO_POW_32
    }

    /// `floor(draw * len)`, the index form every trait draw uses.
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_f64() * len as f64).floor() as usize
    }

    /// Number of draws consumed since construction.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for DeterministicStream {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_raw() as u64;
        let lo = self.next_raw() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
