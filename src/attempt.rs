/*!
 * Single connection attempt
 *
 * Drives the wireless adapter through one candidate: refresh the profile
 * artifact, cycle the registered profile, request a connection, then
 * poll interface status until the target reports connected or the
 * attempt window closes.
 */

use anyhow::Error;
use colored::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::netsh::WlanControl;

/// Knobs for one connection attempt. The settle delay and poll timing
/// are adjustable because sensible values depend on how quickly the
/// wireless driver reports an association.
#[derive(Debug, Clone)]
pub struct AttemptOptions {
    /// Network name, used as both profile name and SSID.
    pub ssid: String,
    /// Where the profile artifact is written each attempt.
    pub profile_path: PathBuf,
    /// Poll iterations after the settle delay, one per poll interval.
    pub timeout_secs: u64,
    /// Wait after issuing the connect request before the first poll.
    pub settle: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
}

impl AttemptOptions {
    pub fn new(ssid: &str, profile_path: PathBuf) -> Self {
        Self {
            ssid: ssid.to_string(),
            profile_path,
            timeout_secs: 1,
            settle: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
        }
    }
}

fn report_failure(what: &str, err: &Error) {
    println!("{} {}: {:#}", "[-]".red(), what, err);
}

/// Try one candidate against the target network.
///
/// Runs the profile-cycle sequence, then polls interface status until
/// the target reports connected, the window closes, or `running` is
/// cleared. Adapter command failures count as a failed attempt and are
/// logged, never propagated; the search simply moves on. Re-invoking
/// with the same candidate repeats the same side effects, so a single
/// attempt is safe to retry.
pub fn attempt_connection(
    adapter: &dyn WlanControl,
    options: &AttemptOptions,
    password: Option<&str>,
    running: &AtomicBool,
) -> bool {
    if let Err(err) = adapter.write_profile(&options.profile_path, &options.ssid, password) {
        report_failure("Profile write failed", &err);
        return false;
    }

    // No active connection or no stale profile make these fail; either
    // way the attempt goes on.
    let _ = adapter.disconnect();
    let _ = adapter.delete_profile(&options.ssid);

    if let Err(err) = adapter.add_profile(&options.profile_path) {
        // Without a registered profile the connect request cannot name
        // one; not worth polling for.
        report_failure("Add profile failed", &err);
        return false;
    }

    if let Err(err) = adapter.connect(&options.ssid) {
        // The status poll decides the outcome; a rejected connect
        // request just means no association will show up.
        println!("{} Connect request failed: {:#}", "[!]".yellow(), err);
    }

    thread::sleep(options.settle);

    for _ in 0..options.timeout_secs {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        match adapter.query_interfaces() {
            Ok(interfaces) => {
                if interfaces.iter().any(|status| status.is_connected_to(&options.ssid)) {
                    return true;
                }
            }
            Err(err) => report_failure("Status query failed", &err),
        }
        thread::sleep(options.poll_interval);
    }

    false
}
