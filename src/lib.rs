pub mod aggregate;
pub mod clip;
pub mod config;
pub mod dataset;
pub mod demo_data;
pub mod error;
pub mod export;
pub mod metrics;
pub mod projection;
pub mod session;
pub mod state;
pub mod stats;
