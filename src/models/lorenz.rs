// src/models/lorenz.rs

use crate::config::Parameters;
use crate::models::state::State;

/// 自励系のベクトル場 dX/dt = f(X)
pub trait VectorField {
    fn derivative(&self, state: &State) -> State;
}

/// ローレンツ方程式の右辺を計算する純粋関数
///
/// # 引数
/// - `state`: 現在の状態 (x, y, z)
/// - `params`: パラメータ (σ, ρ, β)
///
/// # 戻り値
/// - 微分値 (dx/dt, dy/dt, dz/dt)
pub fn lorenz_derivative(state: &State, params: &Parameters) -> State {
    State {
        x: params.sigma * (state.y - state.x),
        y: state.x * (params.rho - state.z) - state.y,
        z: state.x * state.y - params.beta * state.z,
    }
}

/// パラメータを束縛したローレンツベクトル場
#[derive(Debug, Clone, Copy)]
pub struct LorenzField {
    pub params: Parameters,
}

impl LorenzField {
    pub fn new(params: Parameters) -> Self {
        LorenzField { params }
    }
}

impl VectorField for LorenzField {
    fn derivative(&self, state: &State) -> State {
        lorenz_derivative(state, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lorenz_derivative_values() {
        let params = Parameters::default();
        let state = State::new(1.0, 2.0, 3.0);
        let d = lorenz_derivative(&state, &params);

        // dx = 10 * (2 - 1) = 10
        // dy = 1 * (28 - 3) - 2 = 23
        // dz = 1 * 2 - 8/3 * 3 = -6
        assert_eq!(d.x, 10.0);
        assert_eq!(d.y, 23.0);
        assert!((d.z - (-6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_origin_is_fixed_point() {
        let d = lorenz_derivative(&State::default(), &Parameters::default());
        assert_eq!(d, State::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_nonzero_fixed_points() {
        // C± = (±√(β(ρ-1)), ±√(β(ρ-1)), ρ-1)
        let params = Parameters::default();
        let c = (params.beta * (params.rho - 1.0)).sqrt();
        for sign in [1.0, -1.0] {
            let d = lorenz_derivative(&State::new(sign * c, sign * c, params.rho - 1.0), &params);
            assert!(d.x.abs() < 1e-12);
            assert!(d.y.abs() < 1e-12);
            assert!(d.z.abs() < 1e-12);
        }
    }

    #[test]
    fn test_non_finite_input_propagates() {
        let d = lorenz_derivative(&State::new(f64::NAN, 0.0, 0.0), &Parameters::default());
        assert!(d.x.is_nan());
        assert!(d.y.is_nan());
    }

    #[test]
    fn test_field_matches_free_function() {
        let params = Parameters {
            sigma: 3.0,
            rho: 5.0,
            beta: 1.0,
        };
        let field = LorenzField::new(params);
        let s = State::new(-1.0, 4.0, 2.0);
        assert_eq!(field.derivative(&s), lorenz_derivative(&s, &params));
    }
}
