//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through StreamRng instances derived
//! from the single master seed held by the RngBank.
//!
//! Each table gets its own stream slot, and each policy row gets
//! its own record stream inside that slot. This means:
//!   - Adding a new slot never changes existing slots' streams.
//!   - A fan-out produces the same rows whether policies are
//!     processed in order or sharded across threads.

use crate::types::RecordIndex;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64Mcg;

const SLOT_MIX: u64 = 0x9e37_79b9_7f4a_7c15;
const RECORD_MIX: u64 = 0xbf58_476d_1ce4_e5b9;

/// A named, deterministic RNG for one stream.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream from a raw seed. Prefer `RngBank` in
    /// generator code; this exists for tests and tooling.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform integer in the half-open range [lo, hi).
    pub fn range_i64(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(hi > lo, "empty range [{lo}, {hi})");
        let span = (hi - lo) as u64;
        lo + self.next_u64_below(span) as i64
    }

    /// Uniform integer in the closed range [lo, hi].
    pub fn range_inclusive_i64(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(hi >= lo, "empty range [{lo}, {hi}]");
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Gaussian draw with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.inner);
        mean + std_dev * z
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Weighted pick by cumulative roll. Weights need not sum to 1.
    /// Falls back to the last entry if rounding leaves the roll
    /// past the final bucket.
    pub fn choose_weighted<T: Copy>(&mut self, table: &[(T, f64)]) -> T {
        assert!(!table.is_empty(), "weight table must not be empty");
        let total: f64 = table.iter().map(|(_, w)| w).sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (item, weight) in table {
            cumulative += weight;
            if roll < cumulative {
                return *item;
            }
        }
        table[table.len() - 1].0
    }
}

/// All stream RNGs for a single run, indexed by stable slot.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// One stream for a whole table.
    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        let derived = self.master_seed ^ (slot as u64).wrapping_mul(SLOT_MIX);
        StreamRng::from_seed(derived).with_name(slot.name())
    }

    /// One stream per policy row inside a slot. Independent of how
    /// many other records exist or in which order they are visited.
    pub fn for_record(&self, slot: StreamSlot, index: RecordIndex) -> StreamRng {
        let derived = self.master_seed
            ^ (slot as u64).wrapping_mul(SLOT_MIX)
            ^ index.wrapping_add(1).wrapping_mul(RECORD_MIX);
        StreamRng::from_seed(derived).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every table's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Policy = 0,
    Transaction = 1,
    Claim = 2,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::Transaction => "transaction",
            Self::Claim => "claim",
        }
    }
}
