//! RNG module - piece selection
//!
//! Pieces are drawn independently and uniformly from the seven kinds (no bag).
//! A seeded LCG keeps runs reproducible; a scripted source replays a fixed
//! sequence for tests and recorded games.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high half of the state; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        (self.next_u32() >> 16) % max
    }
}

/// Where new pieces come from
#[derive(Debug, Clone)]
pub enum PieceSource {
    /// Uniformly random over the seven kinds
    Uniform(SimpleRng),
    /// A fixed sequence, repeated forever
    Scripted { kinds: Vec<PieceKind>, index: usize },
}

impl PieceSource {
    /// Uniform source seeded with `seed`
    pub fn uniform(seed: u32) -> Self {
        PieceSource::Uniform(SimpleRng::new(seed))
    }

    /// Source that cycles through `kinds`.
    ///
    /// Panics if `kinds` is empty.
    pub fn scripted(kinds: impl Into<Vec<PieceKind>>) -> Self {
        let kinds = kinds.into();
        assert!(!kinds.is_empty(), "scripted piece source needs at least one kind");
        PieceSource::Scripted { kinds, index: 0 }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        match self {
            PieceSource::Uniform(rng) => PieceKind::ALL[rng.next_range(7) as usize],
            PieceSource::Scripted { kinds, index } => {
                let kind = kinds[*index % kinds.len()];
                *index = (*index + 1) % kinds.len();
                kind
            }
        }
    }
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::uniform(1)
    }
}
