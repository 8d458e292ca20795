// src/simulation/summary.rs

use crate::models::state::{Axis, State};
use crate::simulation::framework::Ensemble;

/// 1本の軌道の時間平均
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SummaryVector {
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// 状態列の各座標の算術平均
///
/// 単純な総和で計算するため、NaN/∞ は IEEE の規則どおりに伝播する。
pub fn time_average(states: &[State]) -> SummaryVector {
    let n = states.len() as f64;
    let (sx, sy, sz) = states
        .iter()
        .fold((0.0, 0.0, 0.0), |(sx, sy, sz), s| (sx + s.x, sy + s.y, sz + s.z));
    SummaryVector {
        x: sx / n,
        y: sy / n,
        z: sz / n,
    }
}

/// アンサンブルの各軌道について時間平均を計算する
///
/// # 引数
/// - `ensemble`: 積分済みのアンサンブル
///
/// # 戻り値
/// - 初期条件の順に並んだ N 個の平均ベクトル
pub fn summarize(ensemble: &Ensemble) -> Vec<SummaryVector> {
    ensemble.trajectories().map(time_average).collect()
}

/// 平均ベクトル列を1つの座標へ射影する（ヒストグラム用）
pub fn project(summaries: &[SummaryVector], axis: Axis) -> Vec<f64> {
    summaries.iter().map(|s| s.component(axis)).collect()
}
