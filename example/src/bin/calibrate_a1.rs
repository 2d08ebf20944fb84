// Recover the joint 1 link length (a1) from the home pose
// Run with: cargo run -p example --bin calibrate_a1
// Starts from the preset with a1 zeroed and scans 0..=200 mm in 1 mm steps.

use std::error::Error;

use clap::Parser;
use comau_kinematics::{
    comau_reference_cases, DhParameter, ParameterCalibrator, RobotConfig, ScanRange,
};
use tracing::info;

#[derive(Parser)]
#[command(about = "Scan joint 1 link length against the home position")]
struct Args {
    /// Scan start in meters
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Scan end in meters (inclusive)
    #[arg(long, default_value_t = 0.2)]
    end: f64,

    /// Scan step in meters
    #[arg(long, default_value_t = 0.001)]
    step: f64,

    /// Print every candidate, not just the best one
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let chain = RobotConfig::comau_smart_six()
        .chain()?
        .with_parameter(0, DhParameter::LinkLength, 0.0)?;
    let home = comau_reference_cases()
        .into_iter()
        .next()
        .ok_or("no reference cases")?;

    println!("{}", "=".repeat(90));
    println!("Calibrating a1");
    println!(
        "Target position at q=[0,0,0,0,0,0]: [{:.3}, {:.3}, {:.3}]",
        home.target.x, home.target.y, home.target.z
    );
    println!("{}", "=".repeat(90));

    let calibrator = ParameterCalibrator::new(
        0,
        DhParameter::LinkLength,
        ScanRange::new(args.start, args.end, args.step),
    );

    if args.verbose {
        for result in calibrator.scan(&chain, &home)? {
            println!(
                "  a1 = {:7.4} m -> error {:8.3} mm",
                result.candidate,
                result.error * 1000.0
            );
        }
    }

    let best = calibrator.calibrate(&chain, &home)?;
    info!("✓ Calibrated a1 = {:.4} m", best.candidate);
    println!(
        "\n✓ Optimal a1 found: {:.1}mm ({:.4}m)",
        best.candidate * 1000.0,
        best.candidate
    );
    println!(
        "  Resulting position: [{:.6}, {:.6}, {:.6}]",
        best.position.x, best.position.y, best.position.z
    );
    println!(
        "  Target position:    [{:.6}, {:.6}, {:.6}]",
        home.target.x, home.target.y, home.target.z
    );
    println!("  Error: {:.3}mm", best.error * 1000.0);
    println!("{}", "=".repeat(90));
    Ok(())
}
