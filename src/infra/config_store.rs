// ============================================================
// Layer 3 — Config Store
// ============================================================
// Saves and restores the SAINT+ hyperparameters as JSON so a
// model can be rebuilt with the exact same architecture before
// weights are loaded into it.
//
//   {dir}/saint_config.json
//
// Weights themselves are written by whoever owns training,
// using Burn's recorders.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::ml::model::SaintPlusConfig;

const CONFIG_FILE: &str = "saint_config.json";

pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Creates `dir` (and parents) if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create config directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Validate and write the config. Invalid configs are never persisted.
    pub fn save(&self, cfg: &SaintPlusConfig) -> Result<()> {
        cfg.validate().context("Refusing to save an invalid SAINT+ config")?;

        let path = self.path();
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved SAINT+ config to '{}'", path.display());
        Ok(())
    }

    /// Read the config back and validate it before handing it out.
    pub fn load(&self) -> Result<SaintPlusConfig> {
        let path = self.path();
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        let cfg: SaintPlusConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed SAINT+ config in '{}'", path.display()))?;
        cfg.validate()
            .with_context(|| format!("Invalid SAINT+ config in '{}'", path.display()))?;

        tracing::info!("Loaded SAINT+ config from '{}'", path.display());
        Ok(cfg)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SaintPlusConfig {
        SaintPlusConfig::new(4, 4, 128, 8, 8, 100, 13523, 8, 3, 1441, 301).with_dropout(0.1)
    }

    #[test]
    fn test_save_then_load() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path()).unwrap();
        store.save(&config()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.n_exercises, 13523);
        assert_eq!(loaded.n_lagged_time, 1441);
        assert_eq!(loaded.seq_len, 100);
        assert!((loaded.dropout - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_is_error() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("nested")).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_invalid_config_not_saved() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path()).unwrap();
        let bad   = SaintPlusConfig::new(1, 1, 10, 3, 3, 5, 10, 10, 10, 10, 10);

        assert!(store.save(&bad).is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_invalid_file_rejected_on_load() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path()).unwrap();

        let mut json: serde_json::Value = serde_json::to_value(config()).unwrap();
        json["n_dec_stack"] = serde_json::json!(0);
        fs::write(store.path(), json.to_string()).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Invalid SAINT+ config"));
    }
}
