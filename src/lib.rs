pub mod aggregate;
pub mod calc;
pub mod config;
pub mod distribution;
pub mod error;
pub mod ipc;
pub mod model;
pub mod normalize;
pub mod trend;
