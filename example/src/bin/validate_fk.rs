// Check the COMAU Smart Six model against the published Table 2 poses
// Run with: cargo run -p example --bin validate_fk
// Exit status is 0 when every case is within tolerance, 1 otherwise.

use std::process::ExitCode;

use clap::Parser;
use comau_kinematics::{RobotConfig, Validator, DEFAULT_TOLERANCE};
use tracing::{error, info};

#[derive(Parser)]
#[command(about = "Validate forward kinematics against reference poses")]
struct Args {
    /// Pass/fail distance in meters
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let robot = RobotConfig::comau_smart_six();
    let chain = match robot.chain() {
        Ok(chain) => chain,
        Err(e) => {
            error!("Invalid robot model: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Validating {} at {:.0}mm", chain.name(), args.tolerance * 1000.0);
    let report = match Validator::new()
        .with_tolerance(args.tolerance)
        .validate(&chain, &robot.reference_cases)
    {
        Ok(report) => report,
        Err(e) => {
            error!("Validation could not run: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("Failed to encode report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{chain}");
        println!("{report}");
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
