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

use cardsketch::exact::ExactCounter;
use cardsketch::hll::HllSketch;
use googletest::assert_that;
use googletest::prelude::near;

#[test]
fn test_exact_counting() {
    let mut counter = ExactCounter::new();
    for i in 0..1000_u64 {
        counter.add(i.to_le_bytes());
        counter.add(i.to_le_bytes());
    }
    assert_eq!(counter.count(), 1000);
}

#[test]
fn test_exact_and_sketch_agree_on_small_stream() {
    // The stream the two counters are validated against end to end: three
    // distinct IPs, one repeated.
    let ips = ["10.0.0.1", "10.0.0.2", "10.0.0.1", "10.0.0.3"];

    let mut counter = ExactCounter::new();
    let mut sketch = HllSketch::new(10).unwrap();
    for ip in ips {
        counter.add(ip);
        sketch.update(ip);
    }

    assert_eq!(counter.count(), 3);

    // Three distinct items against m = 1024 keeps the sketch deep in the
    // linear-counting regime with nearly all registers still empty.
    let touched = sketch.registers().iter().filter(|&&r| r != 0).count();
    assert!(touched <= 3);
    assert_that!(sketch.estimate(), near(3.0, 0.5));
}

#[test]
fn test_exact_matches_sketch_within_tolerance() {
    let mut counter = ExactCounter::new();
    let mut sketch = HllSketch::new(14).unwrap();

    for i in 0..20_000_u64 {
        let item = format!("user-{}", i % 10_000);
        counter.add(&item);
        sketch.update(&item);
    }

    assert_eq!(counter.count(), 10_000);
    let truth = counter.count() as f64;
    assert_that!(sketch.estimate(), near(truth, 0.03 * truth));
}
