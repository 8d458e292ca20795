// src/simulation/load_parameters.rs

use std::fs::File;
use std::path::Path;

use serde_yaml::from_reader;

use crate::config::scenario::RunConfig;
use crate::math::error::LorenzError;

/// 実行設定の読み込み
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, LorenzError> {
    let file = File::open(path)?;
    let config: RunConfig = from_reader(file)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_run_config_from_file() {
        let path = std::env::temp_dir().join(format!("lorenzsim_config_{}.yaml", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(
                file,
                "parameters:\n  rho: 14.0\nensemble:\n  trajectories: 12\n  seed: 3\nintegrator:\n  method: rk4\n  substeps: 2"
            )
            .unwrap();
        }
        let config = load_run_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.parameters.rho, 14.0);
        assert_eq!(config.ensemble.trajectories, 12);
        assert_eq!(config.integrator.substeps, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        match load_run_config("does/not/exist.yaml") {
            Err(LorenzError::Io(_)) => (),
            other => panic!("Expected LorenzError::Io, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let path = std::env::temp_dir().join(format!("lorenzsim_bad_{}.yaml", std::process::id()));
        std::fs::write(&path, "ensemble: [1, 2").unwrap();
        let result = load_run_config(&path);
        std::fs::remove_file(&path).unwrap();
        match result {
            Err(LorenzError::Config(_)) => (),
            other => panic!("Expected LorenzError::Config, got {:?}", other),
        }
    }
}
