/*!
 * Online credential trial against a named wireless network.
 *
 * Repeatedly instructs the OS wireless utility to connect with a
 * candidate password and watches interface status to decide whether the
 * candidate worked. The pieces: a resumable candidate generator, an
 * adapter around `netsh wlan`, a bounded-poll connection attempt, and
 * the trial loop tying them together.
 */

// Library modules
pub mod attempt;
pub mod cli;
pub mod netsh;
pub mod password_gen;
pub mod profile;
pub mod trial;

// Re-exports
pub use attempt::{attempt_connection, AttemptOptions};
pub use netsh::{parse_interfaces, InterfaceStatus, Netsh, WlanControl};
pub use password_gen::{search_space, validate_start, Candidates, DIGITS};
pub use trial::{format_elapsed, run_trial, Progress, TrialOutcome, TrialReport};
