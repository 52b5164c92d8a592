use std::io::Write;
use std::time::Duration;

use crate::compare::SnapshotStatus;

/// Per-status tallies for one `check` run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub missing: usize,
    pub errored: usize,
}

impl Summary {
    pub fn record(&mut self, status: &SnapshotStatus) {
        match status {
            SnapshotStatus::Pass { .. } => self.passed += 1,
            SnapshotStatus::Fail { .. } | SnapshotStatus::NoOverlap => self.failed += 1,
            SnapshotStatus::New => self.new += 1,
            SnapshotStatus::Missing => self.missing += 1,
            SnapshotStatus::Error(_) => self.errored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.new + self.missing + self.errored
    }

    pub fn all_passed(&self) -> bool {
        self.total() == self.passed
    }
}

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Print a single snapshot result line.
pub fn print_line(name: &str, status: &SnapshotStatus, elapsed: Duration) {
    clear_line();
    let time_suffix = format!("  \x1b[2m{}\x1b[0m", format_duration(elapsed));

    match status {
        SnapshotStatus::Pass { score } => {
            println!("  \x1b[32mPASS\x1b[0m  {name}  ({score:.4}){time_suffix}");
        }
        SnapshotStatus::Fail {
            score,
            dimension_mismatch,
        } => {
            if let Some((rw, rh, cw, ch)) = dimension_mismatch {
                println!(
                    "  \x1b[31mFAIL\x1b[0m  {name}  ({score:.4}, dimensions changed: {rw}x{rh} -> {cw}x{ch}){time_suffix}"
                );
            } else {
                println!("  \x1b[31mFAIL\x1b[0m  {name}  ({score:.4}){time_suffix}");
            }
        }
        SnapshotStatus::NoOverlap => {
            println!("  \x1b[31mFAIL\x1b[0m  {name}  (no overlapping pixels){time_suffix}");
        }
        SnapshotStatus::New => {
            println!("  \x1b[33m NEW\x1b[0m  {name}  (no reference)");
        }
        SnapshotStatus::Missing => {
            println!("  \x1b[2mGONE\x1b[0m  \x1b[2m{name}  (no current image)\x1b[0m");
        }
        SnapshotStatus::Error(msg) => {
            println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg}){time_suffix}");
        }
    }
}

/// Show comparison progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Comparing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

/// Print the final summary.
pub fn print_summary(summary: &Summary, threshold: f64, elapsed: Duration) {
    let Summary {
        passed,
        failed,
        new,
        missing,
        errored,
    } = *summary;

    clear_line();
    println!();
    print!(
        "Snapshots:  {} total, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{new} new\x1b[0m",
        summary.total()
    );
    if missing > 0 {
        print!(", \x1b[2m{missing} missing\x1b[0m");
    }
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    println!();
    println!("Threshold:  {threshold}");
    println!("Time:       {}", format_duration(elapsed));

    if !summary.all_passed() {
        println!();
        if failed > 0 {
            println!("{failed} snapshot(s) differ beyond the threshold. Heat maps are in difference/.");
        }
        if new > 0 {
            println!("{new} snapshot(s) have no reference.");
        }
        if missing > 0 {
            println!("{missing} reference(s) have no current image.");
        }
        if errored > 0 {
            println!("{errored} snapshot(s) could not be compared.");
        }
        println!("Run `imagediff approve` to accept the current images.");
    }
}
