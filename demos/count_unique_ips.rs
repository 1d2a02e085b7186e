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

//! Compares exact and HyperLogLog distinct-IP counting over an access log.
//!
//! Usage: `cargo run --example count_unique_ips [ACCESS_LOG]`
//!
//! The log is expected to hold one JSON object per line with a
//! `remote_addr` field. Without an argument the demo synthesizes a stream
//! of random IPv4 strings instead.

use std::env;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::time::Instant;

use anyhow::Context;
use cardsketch::common::random::XorShift64;
use cardsketch::exact::ExactCounter;
use cardsketch::hll::HllSketch;

const SKETCH_PRECISIONS: [u8; 3] = [5, 10, 14];

fn main() -> anyhow::Result<()> {
    let ips = match env::args().nth(1) {
        Some(path) => read_log_ips(&path)?,
        None => synthesize_ips(500_000, 40_000),
    };
    println!("Stream length: {} items", ips.len());

    let start = Instant::now();
    let mut counter = ExactCounter::new();
    for ip in &ips {
        counter.add(ip);
    }
    let exact_count = counter.count();
    let exact_secs = start.elapsed().as_secs_f64();

    let mut rows = Vec::new();
    for precision in SKETCH_PRECISIONS {
        let start = Instant::now();
        let mut sketch = HllSketch::new(precision)?;
        for ip in &ips {
            sketch.update(ip);
        }
        rows.push((precision, sketch.estimate(), start.elapsed().as_secs_f64()));
    }

    println!();
    println!(
        "{:<24} {:>14} {:>14} {:>14}",
        "", "distinct items", "time (s)", "error (%)"
    );
    println!(
        "{:<24} {:>14} {:>14.3} {:>14}",
        "exact", exact_count, exact_secs, "-"
    );
    for (precision, estimate, secs) in rows {
        let error = (estimate - exact_count as f64).abs() / exact_count as f64 * 100.0;
        println!(
            "{:<24} {:>14.1} {:>14.3} {:>14.2}",
            format!("hyperloglog (p={precision})"),
            estimate,
            secs,
            error
        );
    }

    Ok(())
}

/// Pulls `remote_addr` out of every JSON log line, skipping records without
/// one.
fn read_log_ips(path: &str) -> anyhow::Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    let mut ips = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: serde_json::Value =
            serde_json::from_str(line).with_context(|| format!("parsing log line: {line}"))?;
        if let Some(ip) = entry.get("remote_addr").and_then(|v| v.as_str()) {
            ips.push(ip.to_string());
        }
    }
    Ok(ips)
}

/// Builds a stream of `len` IPv4 strings drawn from a pool of `distinct`
/// addresses.
fn synthesize_ips(len: usize, distinct: u64) -> Vec<String> {
    let mut generator = XorShift64::seeded(0xACCE55_109);
    (0..len)
        .map(|_| {
            let n = generator.next_bounded(distinct) as u32;
            format!(
                "{}.{}.{}.{}",
                (n >> 24) & 0xFF,
                (n >> 16) & 0xFF,
                (n >> 8) & 0xFF,
                n & 0xFF
            )
        })
        .collect()
}
