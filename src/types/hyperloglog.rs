// HyperLogLog cardinality sketch.
//
// 2^14 = 16384 one-byte registers, the same geometry Redis uses for its
// dense encoding. A register holds the largest "rho" seen for elements
// hashing into it: the 1-based position of the first set bit in the hash
// bits left over after register selection.

/// Bits of the hash used to pick a register.
const INDEX_BITS: u32 = 14;
/// Number of registers (16384).
const NUM_REGISTERS: usize = 1 << INDEX_BITS;
const INDEX_MASK: u64 = (NUM_REGISTERS as u64) - 1;
/// Hash bits left after register selection.
const VALUE_BITS: u32 = 64 - INDEX_BITS;

/// Bias-correction constant for m = 16384.
const ALPHA: f64 = 0.7213 / (1.0 + 1.079 / NUM_REGISTERS as f64);

#[derive(Clone)]
pub struct HyperLogLog {
    registers: Box<[u8; NUM_REGISTERS]>,
}

impl std::fmt::Debug for HyperLogLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperLogLog")
            .field("estimate", &self.count())
            .finish()
    }
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperLogLog {
    pub fn new() -> Self {
        HyperLogLog {
            registers: Box::new([0; NUM_REGISTERS]),
        }
    }

    /// Fold one element into the sketch. Returns true if a register moved,
    /// meaning the estimate may have changed.
    pub fn add(&mut self, element: &str) -> bool {
        let hash = fnv1a(element.as_bytes());
        let index = (hash & INDEX_MASK) as usize;
        let rest = hash >> INDEX_BITS;

        // rho: leading zeros of the remaining VALUE_BITS, plus one.
        // A zero remainder means all VALUE_BITS bits are zero.
        let zeros = (rest << INDEX_BITS).leading_zeros().min(VALUE_BITS);
        let rho = (zeros + 1) as u8;

        if rho > self.registers[index] {
            self.registers[index] = rho;
            true
        } else {
            false
        }
    }

    /// Approximate number of distinct elements added so far.
    pub fn count(&self) -> u64 {
        let mut inverse_sum = 0.0f64;
        let mut zero_registers = 0u32;
        for &r in self.registers.iter() {
            inverse_sum += 2.0f64.powi(-(r as i32));
            if r == 0 {
                zero_registers += 1;
            }
        }

        let m = NUM_REGISTERS as f64;
        let raw = ALPHA * m * m / inverse_sum;

        if raw <= 2.5 * m {
            if zero_registers > 0 {
                // linear counting for small cardinalities
                (m * (m / zero_registers as f64).ln()) as u64
            } else {
                raw as u64
            }
        } else if raw > (1u64 << 32) as f64 / 30.0 {
            let two32 = (1u64 << 32) as f64;
            (-two32 * (1.0 - raw / two32).ln()) as u64
        } else {
            raw as u64
        }
    }

    /// Union with another sketch: register-wise maximum. Returns true if
    /// any register of `self` moved.
    pub fn merge(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (mine, theirs) in self.registers.iter_mut().zip(other.registers.iter()) {
            if theirs > mine {
                *mine = *theirs;
                changed = true;
            }
        }
        changed
    }
}

/// FNV-1a 64-bit.
fn fnv1a(data: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001B3;

    let mut hash = OFFSET_BASIS;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
