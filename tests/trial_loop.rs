// End-to-end trial loop scenarios against a scripted wireless backend.

use std::cell::RefCell;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use wlanbrute::attempt::{attempt_connection, AttemptOptions};
use wlanbrute::netsh::{InterfaceStatus, WlanControl};
use wlanbrute::password_gen::{validate_start, Candidates, DIGITS};
use wlanbrute::trial::{run_trial, TrialOutcome};

/// Scripted stand-in for the OS wireless utility. It accepts exactly one
/// password: an interface reports connected only while a profile carrying
/// that password is registered and a connect was issued for the target.
struct ScriptedWlan {
    target: String,
    real_password: Option<String>,
    reject_add_profile: bool,
    cancel_on_query: Option<(u64, Arc<AtomicBool>)>,
    calls: RefCell<Vec<String>>,
    written_password: RefCell<Option<String>>,
    registered_password: RefCell<Option<String>>,
    connect_requested: RefCell<bool>,
    queries: RefCell<u64>,
}

impl ScriptedWlan {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            real_password: None,
            reject_add_profile: false,
            cancel_on_query: None,
            calls: RefCell::new(Vec::new()),
            written_password: RefCell::new(None),
            registered_password: RefCell::new(None),
            connect_requested: RefCell::new(false),
            queries: RefCell::new(0),
        }
    }

    /// Backend whose network accepts `real_password`.
    fn accepting(target: &str, real_password: &str) -> Self {
        let mut wlan = Self::new(target);
        wlan.real_password = Some(real_password.to_string());
        wlan
    }

    /// Backend whose network accepts no password at all.
    fn rejecting_all(target: &str) -> Self {
        Self::new(target)
    }

    /// Backend that fails every profile registration.
    fn rejecting_add(target: &str) -> Self {
        let mut wlan = Self::new(target);
        wlan.reject_add_profile = true;
        wlan
    }

    /// Clear `flag` from inside status query number `query` (1-based),
    /// simulating an interrupt that lands mid-poll.
    fn cancel_on_query(mut self, query: u64, flag: Arc<AtomicBool>) -> Self {
        self.cancel_on_query = Some((query, flag));
        self
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn count(&self, call: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.as_str() == call)
            .count()
    }

    fn call_names(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl WlanControl for ScriptedWlan {
    fn write_profile(&self, _path: &Path, _ssid: &str, password: Option<&str>) -> Result<()> {
        self.record("write_profile");
        *self.written_password.borrow_mut() = password.map(str::to_string);
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        self.record("disconnect");
        *self.connect_requested.borrow_mut() = false;
        Ok(())
    }

    fn delete_profile(&self, _ssid: &str) -> Result<()> {
        self.record("delete_profile");
        *self.registered_password.borrow_mut() = None;
        Ok(())
    }

    fn add_profile(&self, _path: &Path) -> Result<()> {
        self.record("add_profile");
        if self.reject_add_profile {
            return Err(anyhow!("The filename is invalid"));
        }
        *self.registered_password.borrow_mut() = self.written_password.borrow().clone();
        Ok(())
    }

    fn connect(&self, ssid: &str) -> Result<()> {
        self.record("connect");
        *self.connect_requested.borrow_mut() = ssid == self.target;
        Ok(())
    }

    fn query_interfaces(&self) -> Result<Vec<InterfaceStatus>> {
        self.record("query_interfaces");
        let query_number = {
            let mut queries = self.queries.borrow_mut();
            *queries += 1;
            *queries
        };
        if let Some((on_query, flag)) = &self.cancel_on_query {
            if query_number == *on_query {
                flag.store(false, Ordering::SeqCst);
            }
        }
        let authenticated = self.real_password.is_some()
            && *self.registered_password.borrow() == self.real_password;
        let status = if *self.connect_requested.borrow() && authenticated {
            InterfaceStatus {
                name: Some("Wi-Fi".to_string()),
                kind: Some("Infrastructure".to_string()),
                state: Some("connected".to_string()),
                ssid: Some(self.target.clone()),
            }
        } else {
            InterfaceStatus {
                name: Some("Wi-Fi".to_string()),
                kind: None,
                state: Some("disconnected".to_string()),
                ssid: None,
            }
        };
        Ok(vec![status])
    }
}

/// Attempt options with millisecond timings so a full search stays fast.
fn fast_options(target: &str, polls: u64) -> AttemptOptions {
    let mut options = AttemptOptions::new(
        target,
        std::env::temp_dir().join("wlanbrute_test_profile.xml"),
    );
    options.timeout_secs = polls;
    options.settle = Duration::from_millis(0);
    options.poll_interval = Duration::from_millis(1);
    options
}

#[test]
fn finds_password_after_expected_failures() {
    let wlan = ScriptedWlan::accepting("TestNet", "0042");
    let running = AtomicBool::new(true);
    let progress = RefCell::new(Vec::new());

    let report = run_trial(
        &wlan,
        Candidates::starting_at(DIGITS, 4, "0000"),
        &fast_options("TestNet", 1),
        &running,
        |p| progress.borrow_mut().push(p),
    );

    assert_eq!(report.outcome, TrialOutcome::Success("0042".to_string()));
    assert_eq!(report.attempts, 43);

    let progress = progress.into_inner();
    assert_eq!(progress.len(), 42);
    assert_eq!(progress[0].candidate, "0000");
    assert_eq!(progress[0].attempts, 1);
    assert_eq!(progress[41].candidate, "0041");
    assert_eq!(progress[41].attempts, 42);

    // Success stops the loop: one connect per attempt, none afterwards.
    assert_eq!(wlan.count("connect"), 43);
    assert_eq!(wlan.count("write_profile"), 43);
}

#[test]
fn attempt_steps_run_in_order() {
    let wlan = ScriptedWlan::accepting("TestNet", "7");
    let running = AtomicBool::new(true);

    let connected = attempt_connection(&wlan, &fast_options("TestNet", 1), Some("7"), &running);

    assert!(connected);
    assert_eq!(
        wlan.call_names(),
        vec![
            "write_profile",
            "disconnect",
            "delete_profile",
            "add_profile",
            "connect",
            "query_interfaces",
        ]
    );
}

#[test]
fn add_profile_failure_aborts_the_attempt() {
    let wlan = ScriptedWlan::rejecting_add("TestNet");
    let running = AtomicBool::new(true);

    let connected = attempt_connection(&wlan, &fast_options("TestNet", 3), Some("1234"), &running);

    assert!(!connected);
    // No connect request and no polling after a failed registration.
    assert_eq!(
        wlan.call_names(),
        vec!["write_profile", "disconnect", "delete_profile", "add_profile"]
    );
}

#[test]
fn attempt_is_idempotent_per_candidate() {
    let wlan = ScriptedWlan::accepting("TestNet", "0042");
    let running = AtomicBool::new(true);
    let options = fast_options("TestNet", 1);

    assert!(!attempt_connection(&wlan, &options, Some("1111"), &running));
    assert!(!attempt_connection(&wlan, &options, Some("1111"), &running));
    assert!(attempt_connection(&wlan, &options, Some("0042"), &running));
    assert!(attempt_connection(&wlan, &options, Some("0042"), &running));
}

#[test]
fn exhaustion_after_the_last_candidate() {
    let wlan = ScriptedWlan::rejecting_all("TestNet");
    let running = AtomicBool::new(true);
    let progress = RefCell::new(Vec::new());

    let report = run_trial(
        &wlan,
        Candidates::starting_at(DIGITS, 1, "9"),
        &fast_options("TestNet", 3),
        &running,
        |p| progress.borrow_mut().push(p),
    );

    assert_eq!(report.outcome, TrialOutcome::Exhausted);
    assert_eq!(report.attempts, 1);

    let progress = progress.into_inner();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].candidate, "9");

    // The single attempt polled the full window before giving up.
    assert_eq!(wlan.count("query_interfaces"), 3);
}

#[test]
fn interrupt_mid_poll_cancels_without_new_attempts() {
    let running = Arc::new(AtomicBool::new(true));
    let wlan =
        ScriptedWlan::rejecting_all("TestNet").cancel_on_query(1, running.clone());

    let report = run_trial(
        &wlan,
        Candidates::new(DIGITS, 4),
        &fast_options("TestNet", 5),
        &running,
        |_| {},
    );

    assert_eq!(report.outcome, TrialOutcome::Cancelled);
    assert_eq!(report.attempts, 1);
    // The in-flight attempt stopped polling as soon as the flag dropped
    // and no new candidate was started.
    assert_eq!(wlan.count("query_interfaces"), 1);
    assert_eq!(wlan.count("connect"), 1);
    assert!(report.elapsed < Duration::from_secs(1));
}

#[test]
fn interrupt_before_the_first_attempt_issues_no_commands() {
    let wlan = ScriptedWlan::rejecting_all("TestNet");
    let running = AtomicBool::new(false);

    let report = run_trial(
        &wlan,
        Candidates::new(DIGITS, 4),
        &fast_options("TestNet", 1),
        &running,
        |_| {},
    );

    assert_eq!(report.outcome, TrialOutcome::Cancelled);
    assert_eq!(report.attempts, 0);
    assert!(wlan.call_names().is_empty());
}

#[test]
fn rejected_configuration_reaches_no_adapter() {
    // Mirrors the binary's flow: a bad start value fails validation and
    // the trial loop is never entered.
    let wlan = ScriptedWlan::rejecting_all("TestNet");

    assert!(validate_start("123", DIGITS, 4).is_err());
    assert!(validate_start("00a2", DIGITS, 4).is_err());
    assert!(wlan.call_names().is_empty());
}
