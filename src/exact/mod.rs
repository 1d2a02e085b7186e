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

//! Exact distinct counting.
//!
//! [`ExactCounter`] stores every distinct item it sees, so its memory grows
//! with the number of distinct items. It exists as ground truth for
//! validating [`HllSketch`](crate::hll::HllSketch) accuracy, not as a
//! production counter.

use std::collections::HashSet;

/// A set-based distinct counter.
///
/// # Examples
///
/// ```
/// use cardsketch::exact::ExactCounter;
///
/// let mut counter = ExactCounter::new();
/// assert!(counter.add("10.0.0.1"));
/// assert!(!counter.add("10.0.0.1"));
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExactCounter {
    seen: HashSet<Vec<u8>>,
}

impl ExactCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one item, returning whether it was new.
    pub fn add(&mut self, item: impl AsRef<[u8]>) -> bool {
        self.seen.insert(item.as_ref().to_vec())
    }

    /// Returns the number of distinct items recorded so far.
    pub fn count(&self) -> u64 {
        self.seen.len() as u64
    }

    /// Returns whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let counter = ExactCounter::new();
        assert!(counter.is_empty());
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_duplicates_counted_once() {
        let mut counter = ExactCounter::new();
        for _ in 0..5 {
            counter.add("10.0.0.1");
            counter.add("10.0.0.2");
        }
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_add_reports_novelty() {
        let mut counter = ExactCounter::new();
        assert!(counter.add("a"));
        assert!(counter.add("b"));
        assert!(!counter.add("a"));
    }
}
