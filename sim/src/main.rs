use std::error::Error;

use comau_kinematics::{RobotConfig, Validator};
use sim::{router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();

    let robot = RobotConfig::comau_smart_six();
    let chain = robot.chain()?;
    info!("Kinematic model:\n{}", chain);

    // Startup self-check against the published poses
    let report = Validator::new().validate(&chain, &robot.reference_cases)?;
    if report.all_passed() {
        info!("✓ Forward kinematics validation:\n{}", report);
    } else {
        warn!("✗ Forward kinematics validation:\n{}", report);
    }

    let listener = TcpListener::bind(config.addr()).await?;
    info!("Forward kinematics server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(chain))).await?;
    Ok(())
}
