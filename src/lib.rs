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

//! Streaming distinct-count estimation.
//!
//! This crate provides two ways of counting the distinct items in a stream:
//!
//! - [`hll::HllSketch`]: a HyperLogLog sketch that estimates cardinality in
//!   `O(2^p)` memory, independent of stream length.
//! - [`exact::ExactCounter`]: a set-based baseline that stores every distinct
//!   item and returns the exact count. Intended for validating sketch
//!   accuracy on streams small enough to materialize.
//!
//! Both are fed one item at a time and may be read at any point; neither
//! requires the input to be buffered.
//!
//! # Usage
//!
//! ```rust
//! use cardsketch::exact::ExactCounter;
//! use cardsketch::hll::HllSketch;
//!
//! let mut sketch = HllSketch::new(14).unwrap();
//! let mut baseline = ExactCounter::new();
//!
//! for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.1", "10.0.0.3"] {
//!     sketch.update(ip);
//!     baseline.add(ip);
//! }
//!
//! assert_eq!(baseline.count(), 3);
//! assert!((sketch.estimate() - 3.0).abs() < 1.0);
//! ```

pub mod common;
pub mod error;
pub mod exact;
pub mod hash;
pub mod hll;
