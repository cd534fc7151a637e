pub mod context;
pub mod policy;
pub mod reactor;
pub mod state;
pub mod telemetry;
pub mod time;
