// src/models/mod.rs

pub mod lorenz;
pub mod state;
pub mod time_grid;

pub use lorenz::{lorenz_derivative, LorenzField, VectorField};
pub use state::{Axis, State};
pub use time_grid::{build_time_grid, TimeGrid};
