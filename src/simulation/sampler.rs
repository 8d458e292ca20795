// src/simulation/sampler.rs

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::math::error::LorenzError;
use crate::models::state::State;

/// 初期条件の各座標の下限
pub const SAMPLE_MIN: f64 = -15.0;
/// 初期条件の各座標の上限
pub const SAMPLE_MAX: f64 = 15.0;

/// 2^-53
const UNIT_53: f64 = 1.0 / (1u64 << 53) as f64;

/// [0, 1) の一様乱数
///
/// 64 ビット出力の上位 53 ビットをそのまま仮数に使う。
/// 乱数ライブラリの分布実装には依存させない。
pub fn uniform01<R: RngCore>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * UNIT_53
}

/// 初期条件を決定的に生成する
///
/// 各状態について x, y, z の順に `-15 + 30 * uniform01()` を引く。
/// 乱数生成器は ChaCha8（プラットフォーム・エンディアン非依存）。
///
/// # 引数
/// - `n`: 生成する状態の数（0 以上）
/// - `seed`: 乱数シード
///
/// # 戻り値
/// - `n` 個の初期状態
pub fn sample_initial_conditions(n: i64, seed: u64) -> Result<Vec<State>, LorenzError> {
    if n < 0 {
        return Err(LorenzError::InvalidArgument(format!(
            "初期条件の数は 0 以上である必要があります: {}",
            n
        )));
    }
    let n = usize::try_from(n).map_err(|_| {
        LorenzError::ResourceExhaustion(format!("初期条件の数が大きすぎます: {}", n))
    })?;

    let mut states = Vec::new();
    states.try_reserve_exact(n).map_err(|e| {
        LorenzError::ResourceExhaustion(format!("初期条件 ({} 個) を確保できません: {}", n, e))
    })?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let span = SAMPLE_MAX - SAMPLE_MIN;
    states.extend((0..n).map(|_| {
        let x = SAMPLE_MIN + span * uniform01(&mut rng);
        let y = SAMPLE_MIN + span * uniform01(&mut rng);
        let z = SAMPLE_MIN + span * uniform01(&mut rng);
        State::new(x, y, z)
    }));

    Ok(states)
}
