/*!
 * Wireless control through the OS wireless utility
 *
 * Wraps the `netsh wlan` subcommands the trial loop depends on behind a
 * trait so tests can substitute a scripted backend, and parses the
 * free-form `show interfaces` report into typed records.
 */

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::path::Path;
use std::process::Command;

use crate::profile;

/// Wireless operations one connection attempt drives.
///
/// The production implementation shells out to the OS utility; tests
/// substitute a scripted backend.
pub trait WlanControl {
    /// Persist the profile artifact for `ssid` at `path`. With no
    /// password nothing is written and whatever profile already exists
    /// under that name gets used.
    fn write_profile(&self, path: &Path, ssid: &str, password: Option<&str>) -> Result<()>;

    /// Drop whatever connection is currently active.
    fn disconnect(&self) -> Result<()>;

    /// Remove the profile registered under `ssid`.
    fn delete_profile(&self, ssid: &str) -> Result<()>;

    /// Register the profile document at `path`.
    fn add_profile(&self, path: &Path) -> Result<()>;

    /// Request a connection to `ssid` using its registered profile.
    fn connect(&self, ssid: &str) -> Result<()>;

    /// Fresh snapshot of every wireless interface's reported status.
    fn query_interfaces(&self) -> Result<Vec<InterfaceStatus>>;
}

/// One interface block from the status report. Every field is optional
/// so unrecognized output degrades to "no match" instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceStatus {
    /// Friendly interface name (`Name` / `名称`).
    pub name: Option<String>,
    /// Network type (`Network type` / `网络类型`).
    pub kind: Option<String>,
    /// Connection state (`State` / `状态`).
    pub state: Option<String>,
    /// Associated network identifier, absent when not associated.
    pub ssid: Option<String>,
}

/// State labels the utility reports for an associated interface, in the
/// two vocabularies we recognize.
const CONNECTED_STATES: [&str; 2] = ["connected", "已连接"];

impl InterfaceStatus {
    /// True when the reported state is a connected-state label and the
    /// reported SSID equals `target`, both compared case-insensitively
    /// after trimming.
    pub fn is_connected_to(&self, target: &str) -> bool {
        let state = match self.state.as_deref() {
            Some(state) => state.trim().to_lowercase(),
            None => return false,
        };
        if !CONNECTED_STATES.contains(&state.as_str()) {
            return false;
        }
        match self.ssid.as_deref() {
            Some(ssid) => ssid.trim().to_lowercase() == target.trim().to_lowercase(),
            None => false,
        }
    }
}

/// Parse the free-form `show interfaces` report into one record per
/// interface block. Blocks are separated by blank lines; a block that
/// carries neither a state nor an SSID field is dropped.
pub fn parse_interfaces(raw: &str) -> Vec<InterfaceStatus> {
    let blocks = Regex::new(r"\n\s*\n").unwrap();
    blocks
        .split(raw.trim())
        .filter_map(|block| {
            let status = InterfaceStatus {
                name: field(block, "Name|名称"),
                kind: field(block, "Network type|网络类型|Type|类型"),
                state: field(block, "State|状态"),
                ssid: field(block, "SSID"),
            };
            if status.state.is_some() || status.ssid.is_some() {
                Some(status)
            } else {
                None
            }
        })
        .collect()
}

/// Extract one labelled value from an interface block. A label only
/// counts at the start of a line, so `SSID` never matches inside the
/// unrelated `BSSID` field.
fn field(block: &str, labels: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"(?mi)^\s*(?:{labels})\s*:\s*([^\r\n]+)")).unwrap();
    pattern
        .captures(block)?
        .get(1)
        .map(|value| value.as_str().trim().to_string())
}

/// Production adapter driving `netsh wlan`.
pub struct Netsh;

impl Netsh {
    /// Run one `netsh` invocation and capture its output as lossy UTF-8.
    /// A non-zero exit becomes an error carrying whatever diagnostic
    /// text the command printed.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("netsh")
            .args(args)
            .output()
            .with_context(|| format!("failed to run netsh {}", args.join(" ")))?;
        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stdout.trim().is_empty() { stderr } else { stdout };
            return Err(anyhow!(
                "netsh {} exited with {}: {}",
                args.join(" "),
                output.status,
                diagnostic.trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WlanControl for Netsh {
    fn write_profile(&self, path: &Path, ssid: &str, password: Option<&str>) -> Result<()> {
        match password {
            Some(password) => profile::write(path, ssid, password),
            None => Ok(()),
        }
    }

    fn disconnect(&self) -> Result<()> {
        self.run(&["wlan", "disconnect"])?;
        Ok(())
    }

    fn delete_profile(&self, ssid: &str) -> Result<()> {
        let name = format!("name={}", ssid);
        self.run(&["wlan", "delete", "profile", &name])?;
        Ok(())
    }

    fn add_profile(&self, path: &Path) -> Result<()> {
        let filename = format!("filename={}", path.display());
        self.run(&["wlan", "add", "profile", &filename])?;
        Ok(())
    }

    fn connect(&self, ssid: &str) -> Result<()> {
        let name = format!("name={}", ssid);
        let ssid_arg = format!("ssid={}", ssid);
        self.run(&["wlan", "connect", &name, &ssid_arg])?;
        Ok(())
    }

    fn query_interfaces(&self) -> Result<Vec<InterfaceStatus>> {
        let raw = self.run(&["wlan", "show", "interfaces"])?;
        Ok(parse_interfaces(&raw))
    }
}
