// src/models/state.rs

/// 座標軸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// ある時刻における系の状態 (x, y, z)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl State {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        State { x, y, z }
    }

    /// 指定した軸の成分
    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// 全成分が有限値かどうか
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// `self + h * k`
    pub fn add_scaled(&self, h: f64, k: &State) -> State {
        State {
            x: self.x + h * k.x,
            y: self.y + h * k.y,
            z: self.z + h * k.z,
        }
    }

    /// 係数付き線形結合 `self + h * Σ c_i k_i`
    ///
    /// ルンゲ・クッタ法の段計算で使う。
    pub fn add_combination(&self, h: f64, terms: &[(f64, &State)]) -> State {
        let (dx, dy, dz) = terms.iter().fold((0.0, 0.0, 0.0), |(dx, dy, dz), (c, k)| {
            (dx + c * k.x, dy + c * k.y, dz + c * k.z)
        });
        State {
            x: self.x + h * dx,
            y: self.y + h * dy,
            z: self.z + h * dz,
        }
    }
}

impl From<[f64; 3]> for State {
    fn from(v: [f64; 3]) -> Self {
        State::new(v[0], v[1], v[2])
    }
}

impl From<State> for [f64; 3] {
    fn from(s: State) -> Self {
        [s.x, s.y, s.z]
    }
}
