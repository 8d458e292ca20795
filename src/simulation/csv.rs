// src/simulation/csv.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::math::error::LorenzError;
use crate::simulation::framework::Ensemble;
use crate::simulation::summary::SummaryVector;

/// 出力ファイルを作成する（親ディレクトリがなければ作る）
pub fn setup_csv_output<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>, LorenzError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_file = File::create(path)?;
    Ok(BufWriter::new(output_file))
}

/// 全軌道を `trajectory,time,x,y,z` 形式で書き出す
pub fn write_trajectories_csv<W: Write>(writer: &mut W, ensemble: &Ensemble) -> Result<(), LorenzError> {
    writeln!(writer, "trajectory,time,x,y,z")?;
    let times = ensemble.grid().points();
    for (index, traj) in ensemble.trajectories().enumerate() {
        for (time, state) in times.iter().zip(traj) {
            writeln!(writer, "{},{},{},{},{}", index, time, state.x, state.y, state.z)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// 軌道ごとの時間平均を書き出す
pub fn write_summary_csv<W: Write>(writer: &mut W, summaries: &[SummaryVector]) -> Result<(), LorenzError> {
    writeln!(writer, "trajectory,mean_x,mean_y,mean_z")?;
    for (index, s) in summaries.iter().enumerate() {
        writeln!(writer, "{},{},{},{}", index, s.x, s.y, s.z)?;
    }
    writer.flush()?;
    Ok(())
}
