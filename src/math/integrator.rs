// src/math/integrator.rs

use crate::models::lorenz::VectorField;
use crate::models::state::State;

// Dormand-Prince 5(4) の係数
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
// 5次解の重み（FSAL: 7段目の評価点と同じ）
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;
// 誤差推定の重み (5次 - 4次)
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// 刻み幅制御の安全係数
pub const SAFETY: f64 = 0.9;
/// 1ステップあたりの刻み幅縮小の下限倍率
pub const MIN_FACTOR: f64 = 0.2;
/// 1ステップあたりの刻み幅拡大の上限倍率
pub const MAX_FACTOR: f64 = 10.0;

/// 古典的4次ルンゲ・クッタ法による1ステップ
///
/// # 引数
/// - `field`: ベクトル場
/// - `y`: 現在の状態
/// - `h`: 刻み幅
///
/// # 戻り値
/// - 次の状態
pub fn rk4_step<F: VectorField>(field: &F, y: &State, h: f64) -> State {
    let k1 = field.derivative(y);
    let k2 = field.derivative(&y.add_scaled(0.5 * h, &k1));
    let k3 = field.derivative(&y.add_scaled(0.5 * h, &k2));
    let k4 = field.derivative(&y.add_scaled(h, &k3));
    y.add_combination(h / 6.0, &[(1.0, &k1), (2.0, &k2), (2.0, &k3), (1.0, &k4)])
}

/// Dormand-Prince 1ステップの結果
#[derive(Debug, Clone, PartialEq)]
pub struct DormandPrinceStep {
    pub y_next: State, // 5次解
    pub k_next: State, // y_next での微分値（次ステップの k1 として再利用）
    pub error: State,  // 局所誤差の推定値
}

/// Dormand-Prince 5(4) 法による1ステップ
///
/// # 引数
/// - `field`: ベクトル場
/// - `y`: 現在の状態
/// - `k1`: `y` での微分値
/// - `h`: 刻み幅
///
/// # 戻り値
/// - 5次解、その点での微分値、誤差推定
pub fn dormand_prince_step<F: VectorField>(field: &F, y: &State, k1: &State, h: f64) -> DormandPrinceStep {
    let k2 = field.derivative(&y.add_combination(h, &[(A21, k1)]));
    let k3 = field.derivative(&y.add_combination(h, &[(A31, k1), (A32, &k2)]));
    let k4 = field.derivative(&y.add_combination(h, &[(A41, k1), (A42, &k2), (A43, &k3)]));
    let k5 = field.derivative(&y.add_combination(h, &[(A51, k1), (A52, &k2), (A53, &k3), (A54, &k4)]));
    let k6 = field.derivative(&y.add_combination(
        h,
        &[(A61, k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
    ));
    let y_next = y.add_combination(h, &[(B1, k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)]);
    let k7 = field.derivative(&y_next);

    let error = State::default().add_combination(
        h,
        &[(E1, k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
    );

    DormandPrinceStep {
        y_next,
        k_next: k7,
        error,
    }
}

/// 混合絶対/相対許容誤差で正規化した誤差の RMS ノルム
///
/// 1.0 以下であればステップを受理する。
pub fn error_norm(error: &State, y: &State, y_next: &State, rtol: f64, atol: f64) -> f64 {
    let scaled = |e: f64, a: f64, b: f64| e / (atol + rtol * a.abs().max(b.abs()));
    let ex = scaled(error.x, y.x, y_next.x);
    let ey = scaled(error.y, y.y, y_next.y);
    let ez = scaled(error.z, y.z, y_next.z);
    ((ex * ex + ey * ey + ez * ez) / 3.0).sqrt()
}

fn weighted_rms(v: &State, y: &State, rtol: f64, atol: f64) -> f64 {
    error_norm(v, y, y, rtol, atol)
}

/// 刻み幅制御器の状態
#[derive(Debug, Clone, PartialEq)]
pub struct StepControlState {
    pub h: f64, // 次に試す刻み幅
}

/// 誤差ノルムから次の刻み幅を決める
///
/// # 引数
/// - `state`: 現在の制御器の状態
/// - `used_h`: 今回試した刻み幅
/// - `err`: 今回の誤差ノルム
/// - `accepted`: ステップを受理したか
///
/// # 戻り値
/// - 更新後の制御器の状態
pub fn control_step_size(state: StepControlState, used_h: f64, err: f64, accepted: bool) -> StepControlState {
    if !err.is_finite() {
        return state;
    }
    let factor = if err == 0.0 {
        MAX_FACTOR
    } else {
        (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
    };
    if accepted {
        // 区間終端に合わせて切り詰めたステップでは刻み幅を縮めない
        let proposed = used_h * factor;
        if used_h < state.h {
            StepControlState { h: state.h.max(proposed) }
        } else {
            StepControlState { h: proposed }
        }
    } else {
        StepControlState {
            h: used_h * factor.min(1.0),
        }
    }
}

/// 初期刻み幅の推定 (Hairer, Nørsett & Wanner II.4)
///
/// # 引数
/// - `field`: ベクトル場
/// - `y0`: 初期状態
/// - `f0`: `y0` での微分値
/// - `rtol`, `atol`: 許容誤差
/// - `span`: 積分区間の長さ（上限として使う）
///
/// # 戻り値
/// - 最初に試す刻み幅（正の有限値）
pub fn initial_step_size<F: VectorField>(
    field: &F,
    y0: &State,
    f0: &State,
    rtol: f64,
    atol: f64,
    span: f64,
) -> f64 {
    let d0 = weighted_rms(y0, y0, rtol, atol);
    let d1 = weighted_rms(f0, y0, rtol, atol);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };

    let y1 = y0.add_scaled(h0, f0);
    let f1 = field.derivative(&y1);
    let diff = State::new(f1.x - f0.x, f1.y - f0.y, f1.z - f0.z);
    let d2 = weighted_rms(&diff, y0, rtol, atol) / h0;

    let h1 = if d1.max(d2) <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(0.2)
    };

    let h = (100.0 * h0).min(h1).min(span);
    if h.is_finite() && h > 0.0 {
        h
    } else {
        span / 100.0
    }
}
