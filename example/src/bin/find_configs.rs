// Grid-search joint configurations for the q_s and q_n target positions
// Run with: cargo run -p example --bin find_configs -- --parallel
// Use --target X Y Z to search for an arbitrary tip position instead.

use std::error::Error;

use clap::Parser;
use comau_kinematics::{
    comau_reference_cases, ConfigurationSearcher, RobotConfig, SearchConfig, SearchOutcome,
    DEFAULT_SEARCH_TOLERANCE,
};
use example::{budget, cancel_after};
use nalgebra::Vector3;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(about = "Brute-force joint configurations that reach a tip position")]
struct Args {
    /// Custom target position in meters (X Y Z)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    target: Option<Vec<f64>>,

    /// Match distance in meters
    #[arg(long, default_value_t = DEFAULT_SEARCH_TOLERANCE)]
    tolerance: f64,

    /// Skip configurations outside the joint limits
    #[arg(long)]
    respect_limits: bool,

    /// Spread the grid over all cores
    #[arg(long)]
    parallel: bool,

    /// Cancel each search after this many seconds
    #[arg(long)]
    max_seconds: Option<f64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TargetReport {
    name: String,
    target: Vector3<f64>,
    outcome: SearchOutcome,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let max_duration = args
        .max_seconds
        .map(budget)
        .transpose()
        .map_err(|e| format!("invalid --max-seconds: {e}"))?;

    let chain = RobotConfig::comau_smart_six().chain()?;
    let searcher = ConfigurationSearcher::new(
        SearchConfig::comau_wide()
            .with_tolerance(args.tolerance)
            .with_respect_limits(args.respect_limits),
    );

    let targets: Vec<(String, Vector3<f64>)> = match &args.target {
        Some(xyz) => vec![("custom".to_string(), Vector3::new(xyz[0], xyz[1], xyz[2]))],
        None => comau_reference_cases()
            .into_iter()
            .filter(|case| case.name == "q_s" || case.name == "q_n")
            .map(|case| (case.name, case.target))
            .collect(),
    };

    let mut reports = Vec::with_capacity(targets.len());
    for (name, target) in targets {
        info!("Searching {} configurations for {}", searcher.config().grid_size(), name);
        let cancel = cancel_after(max_duration);

        let outcome = if args.parallel {
            searcher.par_search_with_cancel(&chain, &target, &cancel)?
        } else {
            searcher.search_with_cancel(&chain, &target, &cancel)?
        };

        if outcome.cancelled {
            warn!("Search for {} stopped after {} configurations", name, outcome.evaluated);
        }
        if !args.json {
            print_outcome(&name, &target, &outcome, searcher.config().grid_size());
        }
        reports.push(TargetReport {
            name,
            target,
            outcome,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn print_outcome(name: &str, target: &Vector3<f64>, outcome: &SearchOutcome, grid: usize) {
    let fmt_deg = |angles: Vec<f64>| {
        angles
            .iter()
            .map(|a| format!("{:4.0}", a))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!(
        "\n{name}: Target = [{:.3}, {:.3}, {:.3}]",
        target.x, target.y, target.z
    );
    println!("{}", "-".repeat(90));
    for m in &outcome.matches {
        println!(
            "  q=[{}]° → [{:.3}, {:.3}, {:.3}]  Error: {:5.1}mm",
            fmt_deg(m.angles_deg()),
            m.position.x,
            m.position.y,
            m.position.z,
            m.error * 1000.0
        );
    }

    if outcome.cancelled {
        println!(
            "\n  ⚠ Cancelled after {} of {} configurations",
            outcome.evaluated, grid
        );
    }

    match (outcome.best(), &outcome.closest) {
        (Some(best), _) => {
            println!("\n  ✓ Best: q=[{}]°", fmt_deg(best.angles_deg()));
            println!(
                "    Position: [{:.3}, {:.3}, {:.3}]",
                best.position.x, best.position.y, best.position.z
            );
            println!("    Error: {:.1}mm", best.error * 1000.0);
        }
        (None, Some(closest)) => {
            println!("\n  ✗ No configuration within tolerance");
            println!(
                "    Closest: q=[{}]° at {:.1}mm",
                fmt_deg(closest.angles_deg()),
                closest.error * 1000.0
            );
        }
        (None, None) => println!("\n  ✗ Nothing evaluated"),
    }
}
