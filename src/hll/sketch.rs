// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::hash;
use crate::hll::MAX_PRECISION;
use crate::hll::MIN_PRECISION;
use crate::hll::rho;

/// Estimates switch to linear counting below `2.5 * m`.
const SMALL_RANGE_FACTOR: f64 = 2.5;

/// A HyperLogLog sketch estimating the number of distinct items in a stream.
///
/// Memory is fixed at `2^p` bytes of register space regardless of how many
/// items are fed in. The practical precision range is 4–16; higher `p` means
/// more registers, lower relative error (`~1.04 / sqrt(2^p)`) and more
/// memory.
///
/// Updates are plain synchronous calls with no I/O; the sketch has no
/// interior mutability and is not safe for concurrent mutation. Feed one
/// sketch per producer and [`merge`](Self::merge) them, or guard a shared
/// sketch externally.
///
/// # Examples
///
/// ```
/// use cardsketch::hll::HllSketch;
///
/// let mut sketch = HllSketch::new(10).unwrap();
/// sketch.update("10.0.0.1");
/// sketch.update("10.0.0.2");
/// sketch.update("10.0.0.1"); // duplicates leave the state unchanged
///
/// assert!((sketch.estimate() - 2.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HllSketch {
    precision: u8,
    /// One slot per hash prefix; each holds the largest `rho` observed.
    /// Values only ever increase.
    registers: Vec<u8>,
    /// Bias-correction multiplier, fixed per register count.
    alpha: f64,
    /// `2.5 * m`; raw estimates at or below this use linear counting.
    small_range_threshold: f64,
}

impl HllSketch {
    /// Creates an empty sketch with `2^precision` registers.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPrecision`](crate::error::ErrorKind) if
    /// `precision` is outside `1..=32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardsketch::hll::HllSketch;
    ///
    /// let sketch = HllSketch::new(14).unwrap();
    /// assert_eq!(sketch.num_registers(), 16384);
    /// assert!(HllSketch::new(0).is_err());
    /// assert!(HllSketch::new(33).is_err());
    /// ```
    pub fn new(precision: u8) -> Result<Self, Error> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::invalid_precision(
                precision,
                MIN_PRECISION,
                MAX_PRECISION,
            ));
        }

        let num_registers = 1usize << precision;
        Ok(HllSketch {
            precision,
            registers: vec![0; num_registers],
            alpha: alpha_for(precision, num_registers),
            small_range_threshold: SMALL_RANGE_FACTOR * num_registers as f64,
        })
    }

    /// Feeds one item into the sketch.
    ///
    /// The item's byte representation is hashed with the fixed 32-bit hash
    /// from [`crate::hash`]; the low `precision` bits select a register and
    /// the remaining bits contribute a `rho` observation. Repeating an item
    /// never changes the state, and updates never fail.
    pub fn update(&mut self, item: impl AsRef<[u8]>) {
        let x = hash::hash_item(item.as_ref(), hash::DEFAULT_HASH_SEED);
        self.update_hash(x);
    }

    /// Applies one pre-hashed observation.
    fn update_hash(&mut self, x: u32) {
        let slot = (x as usize) & (self.registers.len() - 1);
        // The shift is done in 64 bits so precision 32 stays defined.
        let w = ((x as u64) >> self.precision) as u32;
        let value = rho(w);
        if value > self.registers[slot] {
            self.registers[slot] = value;
        }
    }

    /// Returns the current cardinality estimate.
    ///
    /// Pure read of the register state: calling it twice with no updates in
    /// between returns the same value. The harmonic-mean estimate
    /// `alpha * m^2 / sum(2^-r)` is replaced by the linear-counting estimate
    /// `m * ln(m / V)` when it falls at or below `2.5 * m` and some register
    /// is still empty (`V` counts empty registers). A fresh sketch therefore
    /// estimates exactly 0.
    ///
    /// No large-range correction is applied, so accuracy degrades for
    /// cardinalities approaching `2^32 / 30`. This keeps parity with other
    /// 32-bit register-array implementations.
    pub fn estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let z: f64 = self.registers.iter().map(|&r| inv_pow2(r)).sum();
        // z >= m * 2^-32 > 0 always, every register contributes.
        let raw = self.alpha * m * m / z;

        if raw <= self.small_range_threshold {
            let empty = self.registers.iter().filter(|&&r| r == 0).count();
            if empty > 0 {
                return m * (m / empty as f64).ln();
            }
        }

        raw
    }

    /// Merges another sketch of the same precision into this one.
    ///
    /// The result is the element-wise maximum of the two register arrays,
    /// exactly the state this sketch would hold had it seen both streams.
    /// Merging is commutative, associative and idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatiblePrecision`](crate::error::ErrorKind)
    /// if the precisions differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardsketch::hll::HllSketch;
    ///
    /// let mut a = HllSketch::new(12).unwrap();
    /// let mut b = HllSketch::new(12).unwrap();
    /// a.update("left");
    /// b.update("right");
    ///
    /// a.merge(&b).unwrap();
    /// assert!((a.estimate() - 2.0).abs() < 0.5);
    /// ```
    pub fn merge(&mut self, other: &HllSketch) -> Result<(), Error> {
        if self.precision != other.precision {
            return Err(Error::incompatible_precision(
                self.precision,
                other.precision,
            ));
        }

        for (register, &theirs) in self.registers.iter_mut().zip(&other.registers) {
            if theirs > *register {
                *register = theirs;
            }
        }
        Ok(())
    }

    /// Returns whether no update has touched any register yet.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Returns the precision this sketch was built with.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the register count `2^precision`.
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Returns a read-only view of the registers.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns the expected relative standard error, `1.04 / sqrt(2^p)`.
    pub fn relative_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }
}

/// Empirical bias-correction constant for `m = 2^precision` registers.
///
/// The three regimes and their exact values come from the HyperLogLog
/// literature; they are inherited constants, not derivable, and the
/// estimator's accuracy expectations depend on reproducing them.
fn alpha_for(precision: u8, num_registers: usize) -> f64 {
    if precision <= 16 {
        0.673
    } else if precision == 32 {
        0.697
    } else {
        0.7213 / (1.0 + 1.079 / num_registers as f64)
    }
}

/// Compute 1 / 2^value (inverse power of 2)
#[inline]
fn inv_pow2(value: u8) -> f64 {
    if value == 0 {
        1.0
    } else if value <= 63 {
        1.0 / (1u64 << value) as f64
    } else {
        f64::exp2(-(value as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_alpha_regimes() {
        assert_eq!(alpha_for(4, 1 << 4), 0.673);
        assert_eq!(alpha_for(16, 1 << 16), 0.673);
        assert_eq!(alpha_for(32, 1 << 32), 0.697);

        let m = (1u64 << 20) as f64;
        assert_eq!(alpha_for(20, 1 << 20), 0.7213 / (1.0 + 1.079 / m));
    }

    #[test]
    fn test_new_rejects_out_of_range_precision() {
        let err = HllSketch::new(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPrecision);

        let err = HllSketch::new(33).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPrecision);
    }

    #[test]
    fn test_fresh_sketch_estimates_zero() {
        let sketch = HllSketch::new(10).unwrap();
        assert!(sketch.is_empty());
        // All registers empty: V = m, so linear counting gives m * ln(1) = 0.
        assert_eq!(sketch.estimate(), 0.0);
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let mut sketch = HllSketch::new(10).unwrap();
        sketch.update("10.0.0.1");
        assert_eq!(sketch.estimate(), sketch.estimate());
    }

    #[test]
    fn test_registers_never_decrease() {
        let mut sketch = HllSketch::new(8).unwrap();
        let mut previous = sketch.registers().to_vec();

        for i in 0..1000_u32 {
            sketch.update(i.to_le_bytes());
            let current = sketch.registers();
            assert!(previous.iter().zip(current).all(|(&old, &new)| new >= old));
            previous = current.to_vec();
        }
    }

    #[test]
    fn test_duplicates_leave_state_unchanged() {
        let mut once = HllSketch::new(10).unwrap();
        let mut repeated = HllSketch::new(10).unwrap();

        for i in 0..100_u32 {
            once.update(i.to_le_bytes());
        }
        for _ in 0..10 {
            for i in 0..100_u32 {
                repeated.update(i.to_le_bytes());
            }
        }

        assert_eq!(once.registers(), repeated.registers());
        assert_eq!(once.estimate(), repeated.estimate());
    }

    #[test]
    fn test_order_independence() {
        let mut forward = HllSketch::new(10).unwrap();
        let mut backward = HllSketch::new(10).unwrap();

        for i in 0..500_u32 {
            forward.update(i.to_le_bytes());
        }
        for i in (0..500_u32).rev() {
            backward.update(i.to_le_bytes());
        }

        assert_eq!(forward.registers(), backward.registers());
    }

    #[test]
    fn test_update_hash_partitioning() {
        let mut sketch = HllSketch::new(4).unwrap();

        // Low 4 bits pick slot 5, high 28 bits are 0b110 -> rho = 3.
        sketch.update_hash(0b110_0101);
        assert_eq!(sketch.registers()[5], 3);

        // Same slot, smaller observation: register keeps its maximum.
        sketch.update_hash(0b1_0101);
        assert_eq!(sketch.registers()[5], 3);

        // High bits all zero maps to the 32 edge case.
        sketch.update_hash(0b0101);
        assert_eq!(sketch.registers()[5], 32);
    }

    #[test]
    fn test_merge_is_elementwise_max() {
        let mut left = HllSketch::new(10).unwrap();
        let mut right = HllSketch::new(10).unwrap();
        let mut both = HllSketch::new(10).unwrap();

        for i in 0..200_u32 {
            left.update(i.to_le_bytes());
            both.update(i.to_le_bytes());
        }
        for i in 150..400_u32 {
            right.update(i.to_le_bytes());
            both.update(i.to_le_bytes());
        }

        left.merge(&right).unwrap();
        assert_eq!(left.registers(), both.registers());
        assert_eq!(left.estimate(), both.estimate());
    }

    #[test]
    fn test_merge_rejects_precision_mismatch() {
        let mut a = HllSketch::new(10).unwrap();
        let b = HllSketch::new(12).unwrap();
        let err = a.merge(&b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatiblePrecision);
    }

    #[test]
    fn test_relative_error() {
        let sketch = HllSketch::new(14).unwrap();
        assert!((sketch.relative_error() - 1.04 / 128.0).abs() < 1e-12);
    }

    #[test]
    fn test_inv_pow2() {
        assert_eq!(inv_pow2(0), 1.0);
        assert_eq!(inv_pow2(1), 0.5);
        assert_eq!(inv_pow2(32), 1.0 / 4294967296.0);
        assert!(inv_pow2(64) > 0.0);
    }
}
