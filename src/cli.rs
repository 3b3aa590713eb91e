use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::password_gen::{self, DIGITS};

fn default_profile_path() -> PathBuf {
    std::env::temp_dir().join("wlan_trial_profile.xml")
}

#[derive(Parser, Debug)]
#[command(name = "wlanbrute")]
#[command(version = "0.1.0")]
#[command(about = "Online WPA2 credential trial against a named wireless network - Educational use only", long_about = None)]
pub struct Args {
    /// Candidate password length
    #[arg(short, long, default_value_t = 8)]
    pub length: usize,

    /// Resume the search from this candidate
    #[arg(short, long)]
    pub start_value: Option<String>,

    /// Name of the network to attack
    #[arg(short, long)]
    pub target: String,

    /// Where the connection profile is written each attempt
    #[arg(long, default_value_os_t = default_profile_path())]
    pub profile_path: PathBuf,

    /// Seconds to poll for an association after each connect request
    #[arg(long, default_value_t = 1)]
    pub timeout: u64,

    /// Seconds to wait after a connect request before polling begins
    #[arg(long, default_value_t = 2)]
    pub settle: u64,
}

impl Args {
    /// Cross-field checks clap cannot express on its own. Rejected
    /// configurations never reach the wireless adapter.
    fn ensure_valid(&self) -> Result<()> {
        if self.length == 0 {
            return Err(anyhow!("length must be at least 1"));
        }
        if let Some(start) = &self.start_value {
            password_gen::validate_start(start, DIGITS, self.length)?;
        }
        Ok(())
    }

    /// Validate, exiting through clap's usage-error path on rejection so
    /// the exit code and stderr format match any other bad invocation.
    pub fn validate(&self) {
        if let Err(err) = self.ensure_valid() {
            let mut cmd = Args::command();
            cmd.error(ErrorKind::ValueValidation, err).exit();
        }
    }
}
