// src/config/scenario.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::config::parameters::{IntegratorSettings, Parameters};
use crate::math::error::LorenzError;

/// 1回の実行を記述する設定ファイル全体
#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub time: TimeSettings,
    pub ensemble: EnsembleSettings,
    #[serde(default)]
    pub integrator: IntegratorSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimeSettings {
    pub max_time: f64,        // 積分終了時刻
    pub points_per_unit: i64, // 単位時間あたりの出力点数
}

impl Default for TimeSettings {
    fn default() -> Self {
        TimeSettings {
            max_time: 4.0,
            points_per_unit: 250,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnsembleSettings {
    pub trajectories: i64,
    pub seed: u64,
    #[serde(default)]
    pub threads: Option<usize>, // None の場合は rayon のグローバルプール
}

/// CSV 出力先（None なら出力しない）
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OutputSettings {
    pub trajectories: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

impl RunConfig {
    /// 積分開始前に行う入力検証
    pub fn validate(&self) -> Result<(), LorenzError> {
        if self.ensemble.trajectories < 0 {
            return Err(LorenzError::InvalidArgument(format!(
                "trajectories は 0 以上である必要があります: {}",
                self.ensemble.trajectories
            )));
        }
        if self.ensemble.threads == Some(0) {
            return Err(LorenzError::InvalidArgument(
                "threads は 1 以上である必要があります".to_string(),
            ));
        }
        self.parameters.validate()?;
        self.integrator.validate()?;
        Ok(())
    }
}
