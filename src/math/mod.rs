// src/math/mod.rs

pub mod error;
pub mod integrator;

pub use error::LorenzError;
pub use integrator::{dormand_prince_step, rk4_step, DormandPrinceStep, StepControlState};
