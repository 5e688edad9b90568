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


//! Fatal records terminate the process, so every scenario runs in a child process: the test
//! binary re-executes itself filtered to one `child_*` test, which does nothing unless the
//! marker variable is set.

use std::fs;
use std::process::Command;
use std::process::Output;

use flexlog::PRIMARY;
use flexlog::Registry;
use flexlog::SECONDARY;
use flexlog::Severity;
use flexlog::logger::Console;
use flexlog::logger::File;
use tempfile::TempDir;

const CHILD_ENV: &str = "FLEXLOG_FATAL_CHILD";
const PATH_ENV: &str = "FLEXLOG_FATAL_PATH";

fn is_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

fn run_child(test: &str, envs: &[(&str, &str)]) -> Output {
    Command::new(std::env::current_exe().unwrap())
        .args([test, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .envs(envs.iter().copied())
        .output()
        .expect("failed to run child test process")
}

#[test]
fn child_console_fatal() {
    if !is_child() {
        return;
    }
    let registry = flexlog::builder()
        .logger(
            PRIMARY,
            Console::default().no_color().with_threshold(Severity::Debug),
        )
        .build()
        .unwrap();
    flexlog::fatal!(registry: &registry, "boom");
}

#[test]
fn test_fatal_renders_then_exits_with_failure() {
    let output = run_child("child_console_fatal", &[]);

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines = stderr
        .lines()
        .filter(|line| line.contains("boom"))
        .collect::<Vec<_>>();
    assert_eq!(lines.len(), 1, "{stderr}");
    assert!(lines[0].contains("<FTL> child_console_fatal():"), "{}", lines[0]);
    // the harness would report the test as passed had the child returned
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("test result: ok"), "{stdout}");
}

#[test]
fn child_file_fatal_via_emit() {
    if !is_child() {
        return;
    }
    let path = std::env::var(PATH_ENV).unwrap();
    let registry = flexlog::builder()
        .logger(PRIMARY, Console::default().no_color().with_threshold(Severity::None))
        .logger(SECONDARY, File::new(path))
        .build()
        .unwrap();
    flexlog::info!(registry: &registry, "before");
    registry.emit(
        Severity::Fatal,
        flexlog::callsite!(),
        format_args!("disk {} failed", "sda"),
    );
    flexlog::info!(registry: &registry, "after");
}

#[test]
fn test_fatal_reaches_file_before_exit() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("fatal.log");
    let path_arg = path.to_string_lossy().into_owned();
    let output = run_child("child_file_fatal_via_emit", &[(PATH_ENV, path_arg.as_str())]);

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "{content}");
    assert!(lines[0].ends_with(" before"));
    assert!(lines[1].contains("-F- child_file_fatal_via_emit():"), "{}", lines[1]);
    assert!(lines[1].ends_with(" disk sda failed"));
}

#[test]
fn child_fatal_without_loggers() {
    if !is_child() {
        return;
    }
    let registry = Registry::new();
    flexlog::fatal!(registry: &registry, "nobody is listening");
}

#[test]
fn test_fatal_exits_even_when_nothing_admits_it() {
    let output = run_child("child_fatal_without_loggers", &[]);

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("nobody is listening"), "{stderr}");
}
