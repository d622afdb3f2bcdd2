use anyhow::{Context, Result};
use shared::{GridConfig, SimConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = ".snakefield";
const DEFAULT_SAVE_SECS: u64 = 10;

/// Everything the client reads from its environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sim: SimConfig,
    pub data_dir: PathBuf,
    pub save_interval: Duration,
}

impl Settings {
    /// Read `SNAKES_CONFIG`, `SNAKES_DATA_DIR` and `SNAKES_SAVE_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let sim = match lookup("SNAKES_CONFIG") {
            Some(path) => load_config(Path::new(&path))?,
            None => terminal_config(),
        };
        sim.validate().context("Invalid simulation config")?;

        let data_dir = lookup("SNAKES_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let save_secs = match lookup("SNAKES_SAVE_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SNAKES_SAVE_SECS is not a number: {raw:?}"))?,
            None => DEFAULT_SAVE_SECS,
        };

        Ok(Self {
            sim,
            data_dir,
            save_interval: Duration::from_secs(save_secs.max(1)),
        })
    }
}

/// Defaults sized for a terminal, where one character is one pixel
pub fn terminal_config() -> SimConfig {
    SimConfig {
        grid: GridConfig { size: 1, gap: 0 },
        ..Default::default()
    }
}

/// Parse a JSON `SimConfig` file
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.sim, terminal_config());
        assert_eq!(settings.data_dir, PathBuf::from(".snakefield"));
        assert_eq!(settings.save_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snakes.json");
        std::fs::write(
            &path,
            r#"{"snakeCount": 3, "fps": 30, "grid": {"size": 2, "gap": 1}}"#,
        )
        .unwrap();

        let settings = Settings::from_lookup(lookup(&[
            ("SNAKES_CONFIG", path.to_str().unwrap()),
            ("SNAKES_DATA_DIR", "/tmp/snakes"),
            ("SNAKES_SAVE_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(settings.sim.snake_count, 3);
        assert_eq!(settings.sim.fps, 30);
        assert_eq!(settings.sim.grid.pitch(), 3);
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/snakes"));
        assert_eq!(settings.save_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"snakeCount": 3, "fps": 30, "grid": {"size": 0, "gap": 0}}"#,
        )
        .unwrap();

        let result = Settings::from_lookup(lookup(&[("SNAKES_CONFIG", path.to_str().unwrap())]));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_save_interval() {
        let result = Settings::from_lookup(lookup(&[("SNAKES_SAVE_SECS", "soon")]));
        assert!(result.is_err());
    }
}
