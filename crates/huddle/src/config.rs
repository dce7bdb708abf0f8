//! Configuration loading for huddle.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use huddle_core::TrialOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub trials: Option<TrialsConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TrialsConfig {
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub parallel: Option<bool>,
    pub shuffle_before_bucketing: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct OutputConfig {
    /// One of "table", "json", "csv"
    pub format: Option<String>,
}

impl Config {
    /// Trial options from the file, falling back to library defaults
    pub fn trial_options(&self) -> TrialOptions {
        let defaults = TrialOptions::default();
        let Some(trials) = self.trials.as_ref() else {
            return defaults;
        };

        TrialOptions {
            trials: trials.count.unwrap_or(defaults.trials),
            seed: trials.seed.or(defaults.seed),
            parallel: trials.parallel.unwrap_or(defaults.parallel),
            shuffle_before_bucketing: trials
                .shuffle_before_bucketing
                .unwrap_or(defaults.shuffle_before_bucketing),
        }
    }

    pub fn output_format(&self) -> Option<&str> {
        self.output
            .as_ref()
            .and_then(|output| output.format.as_deref())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "huddle").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.trial_options(), TrialOptions::default());
        assert!(config.output_format().is_none());
    }

    #[test]
    fn test_partial_trials_section() {
        let config = Config {
            trials: Some(TrialsConfig {
                count: Some(10),
                seed: Some(4),
                ..Default::default()
            }),
            ..Default::default()
        };
        let options = config.trial_options();
        assert_eq!(options.trials, 10);
        assert_eq!(options.seed, Some(4));
        assert!(options.parallel);
        assert!(!options.shuffle_before_bucketing);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("config.toml")).unwrap();
        assert!(config.trials.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[trials]\ncount = 25\nparallel = false\nshuffle_before_bucketing = true\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let options = config.trial_options();
        assert_eq!(options.trials, 25);
        assert!(!options.parallel);
        assert!(options.shuffle_before_bucketing);
        assert_eq!(config.output_format(), Some("json"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[trials\ncount = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}
