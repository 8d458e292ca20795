// src/lib.rs

//! ローレンツ方程式のアンサンブル積分
//!
//! シード付きで生成した N 個の初期条件を共通の時刻格子上で積分し、
//! [N × T × 3] の軌道データと軌道ごとの時間平均を返す。

pub mod config;
pub mod math;
pub mod models;
pub mod simulation;

pub use config::{IntegratorSettings, Method, Parameters, RunConfig};
pub use math::error::LorenzError;
pub use models::{build_time_grid, lorenz_derivative, Axis, State, TimeGrid};
pub use simulation::{
    integrate, integrate_with, project, run_ensemble, sample_initial_conditions, summarize, Ensemble,
    EnsembleRunner, SummaryVector, Trajectory,
};
