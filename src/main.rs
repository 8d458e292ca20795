// src/main.rs

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lorenzsim::simulation::csv::{setup_csv_output, write_summary_csv, write_trajectories_csv};
use lorenzsim::simulation::framework::execute_run;
use lorenzsim::simulation::load_parameters::load_run_config;
use lorenzsim::{project, summarize, Axis};

/// ローレンツ方程式のアンサンブル積分を実行し、結果を CSV に出力する
#[derive(Debug, Parser)]
#[command(name = "lorenzsim", version)]
struct Args {
    /// 実行設定ファイル (YAML)
    #[arg(short, long, default_value = "config/lorenz.yaml")]
    config: PathBuf,

    /// 軌道の本数（設定ファイルの値を上書き）
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    trajectories: Option<i64>,

    /// 乱数シード（設定ファイルの値を上書き）
    #[arg(short, long)]
    seed: Option<u64>,

    /// ワーカースレッド数（設定ファイルの値を上書き）
    #[arg(short, long)]
    threads: Option<usize>,

    /// CSV を出力しない
    #[arg(long)]
    no_output: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 設定の読み込みとコマンドライン引数による上書き
    let mut config = load_run_config(&args.config)?;
    if let Some(n) = args.trajectories {
        config.ensemble.trajectories = n;
    }
    if let Some(seed) = args.seed {
        config.ensemble.seed = seed;
    }
    if let Some(threads) = args.threads {
        config.ensemble.threads = Some(threads);
    }
    info!(config = %args.config.display(), "設定を読み込みました");

    // アンサンブル積分
    let ensemble = execute_run(&config)?;
    let summaries = summarize(&ensemble);

    for axis in Axis::ALL {
        let values = project(&summaries, axis);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            continue;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        info!(axis = axis.label(), min, max, "軌道平均の範囲");
    }

    // CSV出力
    if !args.no_output {
        if let Some(path) = &config.output.trajectories {
            let mut writer = setup_csv_output(path)?;
            write_trajectories_csv(&mut writer, &ensemble)?;
            info!(path = %path.display(), "軌道を書き出しました");
        }
        if let Some(path) = &config.output.summary {
            let mut writer = setup_csv_output(path)?;
            write_summary_csv(&mut writer, &summaries)?;
            info!(path = %path.display(), "時間平均を書き出しました");
        }
    }

    Ok(())
}
