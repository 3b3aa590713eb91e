/*!
 * Trial loop
 *
 * Pulls candidates, runs one connection attempt per candidate, and
 * settles on one of three terminal outcomes: the password that worked,
 * an exhausted search space, or user cancellation.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::attempt::{attempt_connection, AttemptOptions};
use crate::netsh::WlanControl;

/// Terminal state of a trial session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// This candidate connected to the target network.
    Success(String),
    /// Every remaining candidate was tried without a match.
    Exhausted,
    /// Interrupted before the search finished.
    Cancelled,
}

/// What the loop hands back once it stops.
#[derive(Debug)]
pub struct TrialReport {
    pub outcome: TrialOutcome,
    /// Attempts started, the successful one included.
    pub attempts: u64,
    pub elapsed: Duration,
}

/// One failed attempt, as handed to the progress callback.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Candidate that just failed.
    pub candidate: String,
    /// Attempts made so far, this one included.
    pub attempts: u64,
    /// Wall-clock time this attempt took.
    pub attempt_time: Duration,
    /// Wall-clock time since the session started.
    pub total_time: Duration,
}

/// Session counters, bumped once per attempt.
#[derive(Debug)]
pub struct TrialSession {
    pub attempts: u64,
    pub started: Instant,
}

impl TrialSession {
    pub fn new() -> Self {
        Self {
            attempts: 0,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn finish(&self, outcome: TrialOutcome) -> TrialReport {
        TrialReport {
            outcome,
            attempts: self.attempts,
            elapsed: self.elapsed(),
        }
    }
}

impl Default for TrialSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a duration the way the progress line reports cumulative time.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// Run the search until a candidate connects, the generator runs dry,
/// or `running` is cleared.
///
/// The counter is bumped when a candidate is pulled, before its attempt
/// runs; the progress callback fires only for failures. Cancellation is
/// honored at the candidate boundary: an interrupt during an in-flight
/// attempt lets that attempt's side effects complete, then stops the
/// loop before a new one starts.
pub fn run_trial(
    adapter: &dyn WlanControl,
    mut candidates: impl Iterator<Item = String>,
    options: &AttemptOptions,
    running: &AtomicBool,
    on_progress: impl Fn(Progress),
) -> TrialReport {
    let mut session = TrialSession::new();
    loop {
        if !running.load(Ordering::SeqCst) {
            return session.finish(TrialOutcome::Cancelled);
        }
        let Some(candidate) = candidates.next() else {
            return session.finish(TrialOutcome::Exhausted);
        };

        session.attempts += 1;
        let attempt_started = Instant::now();
        if attempt_connection(adapter, options, Some(&candidate), running) {
            return session.finish(TrialOutcome::Success(candidate));
        }
        on_progress(Progress {
            candidate,
            attempts: session.attempts,
            attempt_time: attempt_started.elapsed(),
            total_time: session.elapsed(),
        });
    }
}
