// src/config/parameters.rs

use serde::Deserialize;

use crate::math::error::LorenzError;

/// ローレンツ方程式のパラメータ（1回の積分中は固定）
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Parameters {
    pub sigma: f64, // プラントル数 σ
    pub rho: f64,   // レイリー数 ρ
    pub beta: f64,  // 幾何係数 β
}

impl Default for Parameters {
    /// 古典的なカオス領域 (σ=10, ρ=28, β=8/3)
    fn default() -> Self {
        Parameters {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

impl Parameters {
    /// 呼び出し側から渡された値が有限であることを確認する
    ///
    /// σ, ρ の符号は検査しない（負値でも計算は可能）。
    pub fn validate(&self) -> Result<(), LorenzError> {
        for (name, value) in [("sigma", self.sigma), ("rho", self.rho), ("beta", self.beta)] {
            if !value.is_finite() {
                return Err(LorenzError::InvalidArgument(format!(
                    "パラメータ {} が有限値ではありません: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// σ または ρ が負（物理的に不自然な領域）かどうか
    pub fn is_unphysical(&self) -> bool {
        self.sigma < 0.0 || self.rho < 0.0
    }
}

/// 積分法の種類
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Dormand-Prince 5(4) 埋め込み型ルンゲ・クッタ（適応刻み）
    DormandPrince,
    /// 古典的4次ルンゲ・クッタ（固定刻み）
    Rk4,
}

/// 積分器の設定
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IntegratorSettings {
    pub method: Method,
    pub rtol: f64,       // 相対許容誤差（適応刻みのみ）
    pub atol: f64,       // 絶対許容誤差（適応刻みのみ）
    pub substeps: usize, // 格子1区間あたりの分割数（固定刻みのみ）
}

/// 適応刻みの既定許容誤差
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

impl Default for IntegratorSettings {
    fn default() -> Self {
        IntegratorSettings {
            method: Method::DormandPrince,
            rtol: DEFAULT_TOLERANCE,
            atol: DEFAULT_TOLERANCE,
            substeps: 4,
        }
    }
}

impl IntegratorSettings {
    pub fn rk4(substeps: usize) -> Self {
        IntegratorSettings {
            method: Method::Rk4,
            substeps,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), LorenzError> {
        match self.method {
            Method::DormandPrince => {
                for (name, value) in [("rtol", self.rtol), ("atol", self.atol)] {
                    if !(value.is_finite() && value > 0.0) {
                        return Err(LorenzError::InvalidArgument(format!(
                            "{} は正の有限値である必要があります: {}",
                            name, value
                        )));
                    }
                }
            }
            Method::Rk4 => {
                if self.substeps == 0 {
                    return Err(LorenzError::InvalidArgument(
                        "substeps は 1 以上である必要があります".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_classic() {
        let p = Parameters::default();
        assert_eq!(p.sigma, 10.0);
        assert_eq!(p.rho, 28.0);
        assert!((p.beta - 8.0 / 3.0).abs() < 1e-15);
        assert!(p.validate().is_ok());
        assert!(!p.is_unphysical());
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let p = Parameters {
            sigma: f64::NAN,
            ..Default::default()
        };
        match p.validate() {
            Err(LorenzError::InvalidArgument(_)) => (),
            _ => panic!("Expected LorenzError::InvalidArgument"),
        }

        let p = Parameters {
            beta: f64::INFINITY,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_negative_sigma_is_allowed_but_unphysical() {
        let p = Parameters {
            sigma: -1.0,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
        assert!(p.is_unphysical());
    }

    #[test]
    fn test_integrator_settings_validation() {
        assert!(IntegratorSettings::default().validate().is_ok());
        assert!(IntegratorSettings::rk4(4).validate().is_ok());
        assert!(IntegratorSettings::rk4(0).validate().is_err());

        let bad = IntegratorSettings {
            rtol: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_parameters_from_yaml_with_defaults() {
        let p: Parameters = serde_yaml::from_str("rho: 14.0").unwrap();
        assert_eq!(p.rho, 14.0);
        assert_eq!(p.sigma, 10.0);

        let s: IntegratorSettings = serde_yaml::from_str("method: rk4\nsubsteps: 8").unwrap();
        assert_eq!(s.method, Method::Rk4);
        assert_eq!(s.substeps, 8);
        assert_eq!(s.rtol, DEFAULT_TOLERANCE);
    }
}
