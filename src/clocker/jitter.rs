//! Bounded pseudo-random timing jitter for clock ticks.

/// Park-Miller-Carta 31-bit multiplicative congruential generator.
///
/// Fully deterministic given a seed, so jittered schedules can be replayed
/// exactly in tests. The generator state lives inside the clock core and is
/// only ever touched from the realtime callback.
#[derive(Debug, Clone)]
pub struct JitterRng {
    seed: u32,
}

impl JitterRng {
    /// A zero seed would get the generator stuck, so it is replaced by 1.
    pub fn new(seed: u32) -> Self {
        Self {
            seed: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the sub-second part of the current time.
    pub fn from_clock() -> Self {
        Self::new(chrono::Utc::now().timestamp_subsec_nanos())
    }

    /// Next value in [-1.0, 1.0).
    pub fn next_value(&mut self) -> f64 {
        // Carta's two-multiply formulation, no 64-bit intermediate needed.
        let lo = 16807 * (self.seed & 0xffff);
        let hi = 16807 * (self.seed >> 16);
        let mut next = lo + ((hi & 0x7fff) << 16) + (hi >> 15);
        if next > 0x7fff_ffff {
            next -= 0x7fff_ffff;
        }
        self.seed = next;
        f64::from(next) / f64::from(1u32 << 30) - 1.0
    }
}
