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

//! HyperLogLog sketch for cardinality estimation.
//!
//! The sketch keeps `2^p` single-byte registers, where `p` is the precision
//! chosen at construction. Each incoming item is hashed to 32 bits; the low
//! `p` bits pick a register and the remaining `32 - p` bits contribute an
//! observation `rho(w)` (the bit length of `w`, or 32 when `w == 0`). A
//! register holds the maximum observation seen for its slot, so the sketch
//! state depends only on the set of distinct items, never on arrival order
//! or repetition.
//!
//! The estimator is the bias-corrected harmonic mean of the registers, with
//! a linear-counting fallback while most registers are still empty.
//! Relative error is roughly `1.04 / sqrt(2^p)`, so each extra bit of
//! precision doubles memory and halves the variance.
//!
//! # Usage
//!
//! ```rust
//! use cardsketch::hll::HllSketch;
//!
//! let mut sketch = HllSketch::new(14).unwrap();
//! for i in 0..10_000_u64 {
//!     sketch.update(i.to_le_bytes());
//! }
//!
//! let estimate = sketch.estimate();
//! assert!((estimate - 10_000.0).abs() < 500.0);
//! ```

mod sketch;

pub use self::sketch::HllSketch;

/// Smallest accepted precision.
pub const MIN_PRECISION: u8 = 1;

/// Largest accepted precision; `1 << p` must stay representable.
pub const MAX_PRECISION: u8 = 32;

/// Observation drawn from the high `32 - p` hash bits.
///
/// For `w > 0` this is the position of the leftmost set bit, counted as the
/// number of bits needed to represent `w`. For `w == 0` it is exactly 32:
/// every remaining bit was zero, the longest run this hash width can show.
/// Register contents and the accuracy expectations built on them depend on
/// that constant, even though it slightly overstates the run length next to
/// a strict leading-zero count.
#[inline]
pub(crate) fn rho(w: u32) -> u8 {
    if w == 0 {
        32
    } else {
        (32 - w.leading_zeros()) as u8
    }
}

#[cfg(test)]
mod tests {
    use crate::hll::rho;

    #[test]
    fn test_rho_zero_is_max_run() {
        assert_eq!(rho(0), 32);
    }

    #[test]
    fn test_rho_is_bit_length() {
        assert_eq!(rho(1), 1);
        assert_eq!(rho(2), 2);
        assert_eq!(rho(3), 2);
        assert_eq!(rho(0b1000), 4);
        assert_eq!(rho(u32::MAX), 32);
        assert_eq!(rho(1 << 31), 32);
    }
}
