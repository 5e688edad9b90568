// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::collections::HashSet;
use std::fs;
use std::thread;

use flexlog::PRIMARY;
use flexlog::Severity;
use flexlog::logger::File;
use rand::Rng;
use rand::distr::Alphanumeric;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS: usize = 250;

fn generate_random_string() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(50..=400);
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}

// [<time>] -I- <function>():<line> thread=<t> seq=<m> payload=<text>
fn parse_line(line: &str) -> Option<(usize, usize)> {
    let rest = line.strip_prefix('[')?;
    let (time, rest) = rest.split_once("] -I- ")?;
    time.parse::<f64>().ok()?;
    let (_, message) = rest.split_once(' ')?;

    let mut fields = message.split(' ');
    let thread = fields.next()?.strip_prefix("thread=")?.parse().ok()?;
    let seq = fields.next()?.strip_prefix("seq=")?.parse().ok()?;
    let payload = fields.next()?.strip_prefix("payload=")?;
    if fields.next().is_some() || !payload.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some((thread, seq))
}

#[test]
fn test_concurrent_records_never_interleave() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("concurrent.log");

    let registry = flexlog::builder()
        .logger(PRIMARY, File::new(&path).with_threshold(Severity::Info))
        .build()
        .unwrap();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let registry = &registry;
            scope.spawn(move || {
                for m in 0..RECORDS {
                    let payload = generate_random_string();
                    flexlog::info!(registry: registry, "thread={t} seq={m} payload={payload}");
                    // filtered out, must not reach the file
                    flexlog::debug!(registry: registry, "thread={t} seq={m} hidden");
                }
            });
        }
    });
    registry.unregister(PRIMARY).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.pop(), Some("-*-*-*-*-*-*-*-*-"));
    assert_eq!(lines.len(), THREADS * RECORDS);

    let mut seen = HashSet::new();
    for line in lines {
        let key = parse_line(line).unwrap_or_else(|| panic!("malformed line: {line}"));
        assert!(seen.insert(key), "duplicated record: {line}");
    }
    for t in 0..THREADS {
        for m in 0..RECORDS {
            assert!(seen.contains(&(t, m)), "missing record thread={t} seq={m}");
        }
    }
}

#[test]
fn test_per_thread_order_is_preserved() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("ordered.log");

    let registry = flexlog::builder()
        .logger(PRIMARY, File::new(&path))
        .build()
        .unwrap();

    thread::scope(|scope| {
        for t in 0..4 {
            let registry = &registry;
            scope.spawn(move || {
                for m in 0..100 {
                    flexlog::info!(registry: registry, "thread={t} seq={m} payload=x");
                }
            });
        }
    });
    drop(registry);

    let content = fs::read_to_string(&path).unwrap();
    let mut next = [0usize; 4];
    for line in content.lines().filter(|line| line.starts_with('[')) {
        let (t, m) = parse_line(line).unwrap_or_else(|| panic!("malformed line: {line}"));
        assert_eq!(m, next[t], "thread {t} out of order");
        next[t] += 1;
    }
    assert_eq!(next, [100; 4]);
}
