// src/config/mod.rs

pub mod parameters;
pub mod scenario;

pub use parameters::{IntegratorSettings, Method, Parameters};
pub use scenario::RunConfig;
