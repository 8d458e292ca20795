// src/models/time_grid.rs

use crate::math::error::LorenzError;

/// 軌道を出力する時刻の列
///
/// 0 から `max_time` までの等間隔（両端を含む）。長さは 2 以上で狭義単調増加。
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 常に false（長さ 2 以上が不変条件）
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_time(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// 格子間隔
    pub fn step(&self) -> f64 {
        self.max_time() / (self.points.len() - 1) as f64
    }

    /// 隣接する格子点の組 (t_i, t_{i+1})
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// 時刻格子を生成する
///
/// # 引数
/// - `max_time`: 終了時刻（正の有限値）
/// - `points_per_unit`: 単位時間あたりの点数（正の整数）
///
/// # 戻り値
/// - 長さ `round(points_per_unit * max_time)` の格子
pub fn build_time_grid(max_time: f64, points_per_unit: i64) -> Result<TimeGrid, LorenzError> {
    if !(max_time.is_finite() && max_time > 0.0) {
        return Err(LorenzError::InvalidArgument(format!(
            "max_time は正の有限値である必要があります: {}",
            max_time
        )));
    }
    if points_per_unit <= 0 {
        return Err(LorenzError::InvalidArgument(format!(
            "points_per_unit は正の整数である必要があります: {}",
            points_per_unit
        )));
    }

    let count = (points_per_unit as f64 * max_time).round();
    if count < 2.0 {
        return Err(LorenzError::InvalidArgument(format!(
            "時刻格子の点数が 2 未満です (max_time={}, points_per_unit={})",
            max_time, points_per_unit
        )));
    }
    if count > usize::MAX as f64 {
        return Err(LorenzError::ResourceExhaustion(format!(
            "時刻格子の点数が大きすぎます: {}",
            count
        )));
    }
    let len = count as usize;

    let mut points = Vec::new();
    points.try_reserve_exact(len).map_err(|e| {
        LorenzError::ResourceExhaustion(format!("時刻格子 ({} 点) を確保できません: {}", len, e))
    })?;

    let last = (len - 1) as f64;
    points.extend((0..len - 1).map(|i| max_time * (i as f64 / last)));
    points.push(max_time);

    if points.windows(2).any(|w| w[1] <= w[0]) {
        return Err(LorenzError::InvalidArgument(format!(
            "時刻格子が狭義単調増加になりません (max_time={}, 点数={})",
            max_time, len
        )));
    }

    Ok(TimeGrid { points })
}
