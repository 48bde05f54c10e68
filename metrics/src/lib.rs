/*
 * Copyright 2020 Nikhil Marathe <nsm.nikhil@gmail.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Wall clock timings for the steps of a `nob` invocation.
//!
//! Timing is off unless [`enable`] was called, in which case every [`timed!`] scope records its
//! duration under its label when it ends. Labels are listed in the order their first scope
//! started, so an action comes before the steps nested inside it.

use std::{
    cell::RefCell,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
    thread_local,
    time::{Duration, Instant},
};

#[derive(Debug)]
struct Timing {
    label: &'static str,
    runs: usize,
    total: Duration,
    slowest: Duration,
}

#[derive(Debug, Default)]
struct Timings {
    entries: Vec<Timing>,
}

impl Timings {
    fn entry(&mut self, label: &'static str) -> &mut Timing {
        match self.entries.iter().position(|t| t.label == label) {
            Some(i) => &mut self.entries[i],
            None => {
                self.entries.push(Timing {
                    label,
                    runs: 0,
                    total: Duration::default(),
                    slowest: Duration::default(),
                });
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        }
    }

    fn record(&mut self, label: &'static str, elapsed: Duration) {
        let timing = self.entry(label);
        timing.runs += 1;
        timing.total += elapsed;
        timing.slowest = timing.slowest.max(elapsed);
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|t| t.label.len())
            .max()
            .unwrap_or(0)
            .max("action".len());
        writeln!(
            f,
            "{:width$} {:>5} {:>11} {:>13}",
            "action",
            "runs",
            "total (ms)",
            "slowest (ms)",
            width = width
        )?;
        writeln!(
            f,
            "{:-<width$} {:-<5} {:-<11} {:-<13}",
            "",
            "",
            "",
            "",
            width = width
        )?;
        for t in &self.entries {
            writeln!(
                f,
                "{:width$} {:>5} {:>11.3} {:>13.3}",
                t.label,
                t.runs,
                millis(t.total),
                millis(t.slowest),
                width = width
            )?;
        }
        Ok(())
    }
}

/// Records the time between its creation and its drop under `label`.
#[derive(Debug)]
pub struct Stopwatch {
    label: &'static str,
    start: Instant,
}

impl Stopwatch {
    pub fn start(label: &'static str) -> Self {
        TIMINGS.with(|t| {
            t.borrow_mut().entry(label);
        });
        Stopwatch {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        TIMINGS.with(|t| t.borrow_mut().record(self.label, elapsed));
    }
}

/// Times the rest of the enclosing scope when timings are enabled.
#[macro_export]
macro_rules! timed {
    ($label:expr) => {
        let _stopwatch = if $crate::is_enabled() {
            ::core::option::Option::Some($crate::Stopwatch::start($label))
        } else {
            ::core::option::Option::None
        };
    };
}

thread_local! {
    static TIMINGS: RefCell<Timings> = RefCell::new(Timings::default());
}
static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// The table of everything recorded on this thread so far.
pub fn report() -> String {
    TIMINGS.with(|t| t.borrow().to_string())
}

pub fn dump() {
    eprint!("{}", report());
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_record_accumulates_per_label() {
        let mut timings = Timings::default();
        timings.record("build", Duration::from_millis(5));
        timings.record("clean", Duration::from_millis(1));
        timings.record("build", Duration::from_millis(7));

        assert_eq!(timings.entries.len(), 2);
        let build = &timings.entries[0];
        assert_eq!(build.label, "build");
        assert_eq!(build.runs, 2);
        assert_eq!(build.total, Duration::from_millis(12));
        assert_eq!(build.slowest, Duration::from_millis(7));
        assert_eq!(timings.entries[1].label, "clean");
    }

    #[test]
    fn test_report_layout() {
        let mut timings = Timings::default();
        timings.record("check", Duration::from_millis(2));
        let table = timings.to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("action"));
        assert!(lines[1].starts_with("------"));
        assert!(lines[2].starts_with("check "));
        assert!(lines[2].contains("2.000"));
    }

    #[test]
    fn test_timed_scope() {
        enable();
        {
            timed!("scope");
        }
        assert!(report().contains("scope"));
    }

    #[test]
    fn test_nested_scopes_listed_outer_first() {
        enable();
        {
            timed!("outer");
            {
                timed!("inner");
            }
        }
        let table = report();
        let outer = table.find("outer").expect("outer recorded");
        let inner = table.find("inner").expect("inner recorded");
        assert!(outer < inner, "{}", table);
    }
}
