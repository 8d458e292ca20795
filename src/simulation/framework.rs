// src/simulation/framework.rs

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::config::parameters::{IntegratorSettings, Parameters};
use crate::config::scenario::RunConfig;
use crate::math::error::LorenzError;
use crate::models::lorenz::LorenzField;
use crate::models::state::State;
use crate::models::time_grid::{build_time_grid, TimeGrid};
use crate::simulation::sampler::sample_initial_conditions;
use crate::simulation::trajectory::fill_trajectory;

/// 1回の実行で得られる全軌道
///
/// 軌道 i の状態は `states[i * T .. (i + 1) * T]`（T は格子長）。
/// 生成後は変更されない。
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    grid: TimeGrid,
    initial_conditions: Vec<State>,
    states: Vec<State>,
}

impl Ensemble {
    /// 軌道の本数 N
    pub fn len(&self) -> usize {
        self.initial_conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial_conditions.is_empty()
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// サンプラが生成した順の初期条件
    pub fn initial_conditions(&self) -> &[State] {
        &self.initial_conditions
    }

    pub fn trajectory(&self, index: usize) -> Option<&[State]> {
        if index >= self.len() {
            return None;
        }
        let t = self.grid.len();
        Some(&self.states[index * t..(index + 1) * t])
    }

    /// 初期条件の順に軌道を返す
    pub fn trajectories(&self) -> impl ExactSizeIterator<Item = &[State]> + '_ {
        self.states.chunks_exact(self.grid.len())
    }

    /// [N × T] の連続領域（各要素が3次元状態）
    pub fn as_flat_slice(&self) -> &[State] {
        &self.states
    }

    /// [N][T][3] の入れ子配列へ変換する
    pub fn to_nested(&self) -> Vec<Vec<[f64; 3]>> {
        self.trajectories()
            .map(|traj| traj.iter().map(|s| (*s).into()).collect())
            .collect()
    }
}

/// アンサンブル実行器
///
/// `threads` を指定した場合は専用のスレッドプールを構築し、
/// 指定しない場合は rayon のグローバルプールを使う。
/// スレッド数によらず結果はビット単位で一致する。
#[derive(Debug, Clone, Default)]
pub struct EnsembleRunner {
    pub settings: IntegratorSettings,
    pub threads: Option<usize>,
}

impl EnsembleRunner {
    pub fn new(settings: IntegratorSettings) -> Self {
        EnsembleRunner { settings, threads: None }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// 全軌道を積分してアンサンブルを返す
    ///
    /// # 引数
    /// - `n`: 初期条件の数（0 以上）
    /// - `params`: ローレンツパラメータ
    /// - `grid`: 出力時刻の格子
    /// - `seed`: 初期条件の乱数シード
    ///
    /// # 戻り値
    /// - 初期条件の順に並んだ N 本の軌道。失敗時は部分結果を返さない
    pub fn run(&self, n: i64, params: &Parameters, grid: &TimeGrid, seed: u64) -> Result<Ensemble, LorenzError> {
        params.validate()?;
        self.settings.validate()?;
        if self.threads == Some(0) {
            return Err(LorenzError::InvalidArgument(
                "threads は 1 以上である必要があります".to_string(),
            ));
        }
        if params.is_unphysical() {
            warn!(
                sigma = params.sigma,
                rho = params.rho,
                "σ または ρ が負です。軌道が発散する可能性があります"
            );
        }

        // 乱数を引く前にアンサンブル全体の大きさを確定させる
        if n < 0 {
            return Err(LorenzError::InvalidArgument(format!(
                "初期条件の数は 0 以上である必要があります: {}",
                n
            )));
        }
        let count = usize::try_from(n)
            .map_err(|_| LorenzError::ResourceExhaustion(format!("初期条件の数が大きすぎます: {}", n)))?;
        let t = grid.len();
        let total = count.checked_mul(t).ok_or_else(|| {
            LorenzError::ResourceExhaustion(format!(
                "アンサンブルの大きさがオーバーフローします ({} 本 × {} 点)",
                count, t
            ))
        })?;

        let mut states: Vec<State> = Vec::new();
        states.try_reserve_exact(total).map_err(|e| {
            LorenzError::ResourceExhaustion(format!("{} 個の状態を確保できません: {}", total, e))
        })?;
        states.resize(total, State::default());

        let initial_conditions = sample_initial_conditions(n, seed)?;

        debug!(
            n = initial_conditions.len(),
            points = t,
            seed,
            sigma = params.sigma,
            rho = params.rho,
            beta = params.beta,
            method = ?self.settings.method,
            "アンサンブル積分を開始します"
        );

        let field = LorenzField::new(*params);
        let settings = &self.settings;
        let initials = &initial_conditions;
        let simulate = |buffer: &mut [State]| {
            buffer
                .par_chunks_mut(t)
                .zip(initials.par_iter())
                .for_each(|(chunk, initial)| fill_trajectory(&field, *initial, grid, settings, chunk));
        };

        match self.threads {
            Some(threads) => ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| LorenzError::ThreadPool(e.to_string()))?
                .install(|| simulate(states.as_mut_slice())),
            None => simulate(states.as_mut_slice()),
        }

        let ensemble = Ensemble {
            grid: grid.clone(),
            initial_conditions,
            states,
        };

        let diverged = ensemble
            .trajectories()
            .filter(|traj| !traj.iter().all(State::is_finite))
            .count();
        if diverged > 0 {
            warn!(diverged, total = ensemble.len(), "非有限値を含む軌道があります");
        }
        info!(trajectories = ensemble.len(), points = t, "アンサンブル積分が完了しました");

        Ok(ensemble)
    }
}

/// 既定の積分器設定でアンサンブルを実行する
pub fn run_ensemble(n: i64, params: &Parameters, grid: &TimeGrid, seed: u64) -> Result<Ensemble, LorenzError> {
    EnsembleRunner::default().run(n, params, grid, seed)
}

/// 設定ファイルの内容から1回の実行を行う
///
/// 検証はすべて積分開始前に行う。
pub fn execute_run(config: &RunConfig) -> Result<Ensemble, LorenzError> {
    config.validate()?;
    let grid = build_time_grid(config.time.max_time, config.time.points_per_unit)?;
    let runner = EnsembleRunner {
        settings: config.integrator.clone(),
        threads: config.ensemble.threads,
    };
    runner.run(config.ensemble.trajectories, &config.parameters, &grid, config.ensemble.seed)
}
