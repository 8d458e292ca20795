// src/math/error.rs

use thiserror::Error;

/// 積分コア全体で共通のエラー
///
/// 数値発散（NaN/∞）はエラーではなく、軌道の値としてそのまま伝播させる。
#[derive(Error, Debug)]
pub enum LorenzError {
    /// 積分開始前の入力検証で検出される不正な引数
    #[error("不正な引数: {0}")]
    InvalidArgument(String),

    /// アンサンブル全体を確保・計算できない場合（部分結果は返さない）
    #[error("リソース不足: {0}")]
    ResourceExhaustion(String),

    /// 専用スレッドプールの構築に失敗した
    #[error("スレッドプールの構築に失敗しました: {0}")]
    ThreadPool(String),

    #[error("入出力エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("設定ファイルの読み込みに失敗しました: {0}")]
    Config(#[from] serde_yaml::Error),
}
