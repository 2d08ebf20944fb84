// Library exports for the forward-kinematics server

pub mod api;
pub mod config;

pub use api::{router, ApiError, AppState, ErrorResponse, FkineRequest, FkineResponse};
pub use config::ServerConfig;
