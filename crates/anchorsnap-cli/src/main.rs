//! AnchorSnap scenario runner.
//!
//! Replays a JSON scenario (configuration plus a list of container
//! operations) and prints the resulting item table as JSON.

mod scenario;

use clap::Parser;
use scenario::{replay, CliError, Scenario};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "anchorsnap", version, about = "Replay anchor snapping scenarios")]
struct Args {
    /// Scenario file to replay.
    scenario: PathBuf,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

fn run(args: &Args) -> Result<String, CliError> {
    let scenario = Scenario::load(&args.scenario)?;
    log::info!(
        "Replaying {} steps from {}",
        scenario.steps.len(),
        args.scenario.display()
    );
    let report = replay(&scenario)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("anchorsnap: {e}");
            ExitCode::FAILURE
        }
    }
}
