// src/stats.rs
// Pure run statistics: comparison times, display strings, run counts.
// Nothing here touches HTML or IO.

use crate::model::Run;

/// Sentinel comparison time for "did not start" and anything else that
/// yields no usable elapsed time. Ordering only, never displayed as-is.
pub const DNS_TIME: f64 = 999.999;

/// Seconds added per cone hit.
pub const CONE_PENALTY: f64 = 2.0;

/// Elapsed seconds out of the raw time text. None for empty or
/// non-numeric text; callers decide what that means.
pub fn parse_seconds(time: &str) -> Option<f64> {
    let t = time.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok()
}

/// Comparison-ready time with penalties folded in. DNF runs and runs
/// without a parsable time collapse to the DNS sentinel so they sort last.
pub fn actual_time(run: &Run) -> f64 {
    if run.dnf {
        return DNS_TIME;
    }
    match parse_seconds(&run.time) {
        Some(t) if run.cones > 0 => t + run.cones as f64 * CONE_PENALTY,
        Some(t) => t,
        None => DNS_TIME,
    }
}

/// Report notation for a run: `45.123`, `44.500+1`, `45.800+dnf`, or `dns`
/// when the run was never attempted.
pub fn display_run(run: &Run) -> String {
    if run.time.is_empty() {
        return s!("dns");
    }
    if run.dnf {
        return join!(&*run.time, "+dnf");
    }
    if run.cones > 0 {
        return format!("{}+{}", run.time, run.cones);
    }
    run.time.clone()
}

/// Attempted runs: those with a time entry, DNF or not.
pub fn count_runs(runs: &[Run]) -> usize {
    runs.iter().filter(|r| !r.time.is_empty()).count()
}

/// Display string of the most recent attempted run; `dns` if none.
pub fn latest_run(runs: &[Run]) -> String {
    match runs.iter().filter(|r| !r.time.is_empty()).next_back() {
        Some(run) => display_run(run),
        None => s!("dns"),
    }
}

/// The non-DNF run with the lowest actual time, measured against a DNS
/// baseline. Strict less-than, so the first of a tie wins.
pub fn fastest(runs: &[Run]) -> Option<&Run> {
    let mut best: Option<&Run> = None;
    let mut best_time = DNS_TIME;
    for run in runs {
        if run.dnf {
            continue;
        }
        let t = actual_time(run);
        if t < best_time {
            best_time = t;
            best = Some(run);
        }
    }
    best
}

/// Display string of the fastest run; `dns` when nothing beats the baseline.
pub fn fastest_run(runs: &[Run]) -> String {
    match fastest(runs) {
        Some(run) => display_run(run),
        None => s!("dns"),
    }
}
