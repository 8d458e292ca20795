// src/simulation/mod.rs

pub mod csv;
pub mod framework;
pub mod load_parameters;
pub mod sampler;
pub mod summary;
pub mod trajectory;

pub use framework::{execute_run, run_ensemble, Ensemble, EnsembleRunner};
pub use sampler::sample_initial_conditions;
pub use summary::{project, summarize, SummaryVector};
pub use trajectory::{integrate, integrate_with, Trajectory};
