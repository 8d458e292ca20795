// src/simulation/trajectory.rs

use crate::config::parameters::{IntegratorSettings, Method, Parameters};
use crate::math::error::LorenzError;
use crate::math::integrator::{
    control_step_size, dormand_prince_step, error_norm, initial_step_size, rk4_step, StepControlState,
};
use crate::models::lorenz::{LorenzField, VectorField};
use crate::models::state::State;
use crate::models::time_grid::TimeGrid;

/// 積分区間に対する最小刻み幅の比
const MIN_STEP_FRACTION: f64 = 1e-12;
/// 格子1区間あたりの最大試行ステップ数
const MAX_STEPS_PER_INTERVAL: usize = 10_000;

/// 1つの初期条件から得られる状態の時系列
///
/// 長さは時刻格子と同じで、先頭は初期状態そのもの。
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<State>,
}

impl Trajectory {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial(&self) -> Option<&State> {
        self.states.first()
    }

    /// 全点が有限値かどうか
    pub fn is_finite(&self) -> bool {
        self.states.iter().all(State::is_finite)
    }

    pub fn into_states(self) -> Vec<State> {
        self.states
    }
}

/// 既定の設定（Dormand-Prince 5(4)、固定許容誤差）で軌道を積分する
///
/// # 引数
/// - `initial`: 初期状態
/// - `grid`: 出力時刻の格子
/// - `params`: ローレンツパラメータ
///
/// # 戻り値
/// - 格子点ごとの状態列
pub fn integrate(initial: State, grid: &TimeGrid, params: &Parameters) -> Trajectory {
    integrate_with(initial, grid, params, &IntegratorSettings::default())
}

/// 積分法を指定して軌道を積分する
pub fn integrate_with(
    initial: State,
    grid: &TimeGrid,
    params: &Parameters,
    settings: &IntegratorSettings,
) -> Trajectory {
    let mut states = vec![initial; grid.len()];
    fill_trajectory(&LorenzField::new(*params), initial, grid, settings, &mut states);
    Trajectory { states }
}

/// 呼び出し側が確保したバッファへ軌道を書き込む
///
/// 発散して非有限値になった場合もエラーにはせず、そのまま残りの格子点へ
/// 伝播させる。
///
/// # 引数
/// - `field`: ベクトル場
/// - `initial`: 初期状態
/// - `grid`: 出力時刻の格子
/// - `settings`: 積分器の設定
/// - `out`: 出力先（長さは格子と同じ）
///
/// # 戻り値
/// - `out` の長さが格子と異なる場合は `InvalidArgument`
pub fn integrate_into<F: VectorField>(
    field: &F,
    initial: State,
    grid: &TimeGrid,
    settings: &IntegratorSettings,
    out: &mut [State],
) -> Result<(), LorenzError> {
    if out.len() != grid.len() {
        return Err(LorenzError::InvalidArgument(format!(
            "出力バッファの長さ {} が時刻格子の長さ {} と一致しません",
            out.len(),
            grid.len()
        )));
    }
    fill_trajectory(field, initial, grid, settings, out);
    Ok(())
}

/// 長さが格子と一致するバッファへ軌道を書き込む
pub(crate) fn fill_trajectory<F: VectorField>(
    field: &F,
    initial: State,
    grid: &TimeGrid,
    settings: &IntegratorSettings,
    out: &mut [State],
) {
    out[0] = initial;
    match settings.method {
        Method::Rk4 => integrate_rk4(field, grid, settings.substeps.max(1), out),
        Method::DormandPrince => integrate_adaptive(field, grid, settings.rtol, settings.atol, out),
    }
}

fn integrate_rk4<F: VectorField>(field: &F, grid: &TimeGrid, substeps: usize, out: &mut [State]) {
    let mut y = out[0];
    for (i, (t0, t1)) in grid.intervals().enumerate() {
        let h = (t1 - t0) / substeps as f64;
        for _ in 0..substeps {
            y = rk4_step(field, &y, h);
        }
        out[i + 1] = y;
    }
}

fn integrate_adaptive<F: VectorField>(field: &F, grid: &TimeGrid, rtol: f64, atol: f64, out: &mut [State]) {
    let span = grid.max_time() - grid.points()[0];
    let h_min = MIN_STEP_FRACTION * span;

    let mut y = out[0];
    let mut k1 = field.derivative(&y);
    let mut control = StepControlState {
        h: initial_step_size(field, &y, &k1, rtol, atol, span),
    };

    for (i, (t0, t1)) in grid.intervals().enumerate() {
        let mut t = t0;
        let mut steps = 0;
        while t < t1 {
            let remaining = t1 - t;

            // 発散後、または試行回数の上限に達した後は刻み幅制御をやめ、
            // 区間終端まで1ステップで進める
            if !y.is_finite() || steps >= MAX_STEPS_PER_INTERVAL {
                let jump = dormand_prince_step(field, &y, &k1, remaining);
                y = jump.y_next;
                k1 = jump.k_next;
                break;
            }

            let h = control.h.max(h_min);
            let (step, last) = if h >= remaining { (remaining, true) } else { (h, false) };

            let trial = dormand_prince_step(field, &y, &k1, step);
            let err = error_norm(&trial.error, &y, &trial.y_next, rtol, atol);
            steps += 1;

            let forced = step <= h_min || !err.is_finite();
            let accepted = err <= 1.0 || forced;
            control = control_step_size(control, step, err, accepted);

            if accepted {
                t = if last { t1 } else { t + step };
                y = trial.y_next;
                k1 = trial.k_next;
            }
        }
        out[i + 1] = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_grid::build_time_grid;

    #[test]
    fn test_first_state_is_initial() {
        let grid = build_time_grid(1.0, 100).unwrap();
        let initial = State::new(1.234, -5.678, 9.1011);
        let traj = integrate(initial, &grid, &Parameters::default());
        assert_eq!(traj.len(), grid.len());
        assert_eq!(traj.initial(), Some(&initial));
        assert_eq!(traj.states()[0], initial);
    }

    #[test]
    fn test_fixed_point_stays_fixed() {
        let grid = build_time_grid(2.0, 50).unwrap();
        let traj = integrate(State::default(), &grid, &Parameters::default());
        assert!(traj.states().iter().all(|s| *s == State::default()));
    }

    #[test]
    fn test_stable_regime_converges_to_fixed_point() {
        // ρ < 1 では原点が大域安定
        let params = Parameters {
            sigma: 10.0,
            rho: 0.5,
            beta: 8.0 / 3.0,
        };
        let grid = build_time_grid(20.0, 10).unwrap();
        let traj = integrate(State::new(5.0, -3.0, 4.0), &grid, &params);
        let last = traj.states()[traj.len() - 1];
        assert!(last.x.abs() < 1e-3);
        assert!(last.y.abs() < 1e-3);
        assert!(last.z.abs() < 1e-3);
    }

    #[test]
    fn test_rk4_and_dormand_prince_agree() {
        let grid = build_time_grid(1.0, 250).unwrap();
        let params = Parameters::default();
        let initial = State::new(1.0, 1.0, 1.0);
        let adaptive = integrate(initial, &grid, &params);
        let fixed = integrate_with(initial, &grid, &params, &IntegratorSettings::rk4(4));
        for (a, b) in adaptive.states().iter().zip(fixed.states()) {
            assert!((a.x - b.x).abs() < 1e-3, "{:?} vs {:?}", a, b);
            assert!((a.y - b.y).abs() < 1e-3, "{:?} vs {:?}", a, b);
            assert!((a.z - b.z).abs() < 1e-3, "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_deterministic() {
        let grid = build_time_grid(4.0, 250).unwrap();
        let params = Parameters::default();
        let initial = State::new(-7.5, 3.25, 12.0);
        assert_eq!(integrate(initial, &grid, &params), integrate(initial, &grid, &params));
    }

    /// dx/dt = 1000 x（t ≈ 0.71 で f64 の範囲を超える）
    struct Explosive;

    impl VectorField for Explosive {
        fn derivative(&self, state: &State) -> State {
            State::new(1000.0 * state.x, 0.0, 0.0)
        }
    }

    #[test]
    fn test_divergence_propagates_without_panic() {
        let grid = build_time_grid(2.0, 10).unwrap();
        let mut out = vec![State::default(); grid.len()];
        let initial = State::new(1.0, 0.0, 0.0);
        integrate_into(&Explosive, initial, &grid, &IntegratorSettings::default(), &mut out).unwrap();

        assert_eq!(out[0], initial);
        assert!(out[1].is_finite());
        assert!(!out[grid.len() - 1].is_finite());
        // 一度非有限になった後は最後まで非有限のまま
        let first_bad = out.iter().position(|s| !s.is_finite()).unwrap();
        assert!(out[first_bad..].iter().all(|s| !s.is_finite()));
    }

    #[test]
    fn test_integrate_into_rejects_mismatched_buffer() {
        let grid = build_time_grid(1.0, 10).unwrap();
        let field = LorenzField::new(Parameters::default());
        let settings = IntegratorSettings::default();
        let initial = State::new(1.0, 1.0, 1.0);

        let mut empty: Vec<State> = Vec::new();
        match integrate_into(&field, initial, &grid, &settings, &mut empty) {
            Err(LorenzError::InvalidArgument(_)) => (),
            other => panic!("Expected LorenzError::InvalidArgument, got {:?}", other),
        }

        let mut short = vec![State::default(); grid.len() - 1];
        assert!(integrate_into(&field, initial, &grid, &settings, &mut short).is_err());
        // 失敗時はバッファに書き込まない
        assert!(short.iter().all(|s| *s == State::default()));

        let mut exact = vec![State::default(); grid.len()];
        integrate_into(&field, initial, &grid, &settings, &mut exact).unwrap();
        assert_eq!(exact, integrate(initial, &grid, &Parameters::default()).into_states());
    }

    #[test]
    fn test_non_finite_initial_state() {
        let grid = build_time_grid(1.0, 10).unwrap();
        let initial = State::new(f64::NAN, 0.0, 0.0);
        let traj = integrate(initial, &grid, &Parameters::default());
        assert_eq!(traj.len(), 10);
        assert!(traj.states()[0].x.is_nan());
        assert!(traj.states().iter().skip(1).all(|s| !s.is_finite()));
    }
}
