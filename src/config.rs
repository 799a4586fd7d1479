//! Configuration loading for mnemo.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.mnemo/config.toml`)
//! 3. User config (`~/.mnemo/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with standard scheduling
//! behavior when no config exists. Malformed environment overrides are
//! warned about and ignored rather than failing startup.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::scheduler::SchedulerParams;
use crate::error::{MnemoError, Result};

/// Main configuration struct for mnemo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Scheduler constants.
    pub scheduler: SchedulerParams,
    /// Quiz option building.
    pub quiz: QuizConfig,
}

/// Quiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuizConfig {
    /// Wrong answers per multiple-choice question.
    pub distractor_count: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            distractor_count: crate::quiz::DEFAULT_DISTRACTOR_COUNT,
        }
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        let mut config = match env::current_dir() {
            Ok(cwd) => Self::load_for_dir(&cwd),
            Err(_) => Self::load_user_or_default(),
        };
        config.apply_env_overrides();
        config.validate();
        config
    }

    /// Load configuration for a specific project directory (no env
    /// overrides applied; useful in tests).
    pub fn load_for_dir(dir: &Path) -> Self {
        let project_path = dir.join(".mnemo").join("config.toml");
        if project_path.exists() {
            match Self::load_from_path(&project_path) {
                Ok(config) => return config,
                Err(err) => {
                    tracing::warn!(
                        "failed to load project config {}: {} (falling back)",
                        project_path.display(),
                        err
                    );
                }
            }
        }
        Self::load_user_or_default()
    }

    fn load_user_or_default() -> Self {
        let Some(path) = user_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "failed to load user config {}: {} (using defaults)",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MnemoError::storage(path, e))?;
        toml::from_str(&content)
            .map_err(|e| MnemoError::config(format!("{}: {}", path.display(), e)))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("MNEMO_LAPSE_DELAY_MINUTES") {
            match val.parse::<u32>() {
                Ok(minutes) => self.scheduler.lapse_delay_minutes = minutes,
                Err(_) => {
                    tracing::warn!("MNEMO_LAPSE_DELAY_MINUTES is not a number: {}", val);
                }
            }
        }

        if let Ok(val) = env::var("MNEMO_EASE_STEP") {
            match val.parse::<f64>() {
                Ok(step) if step > 0.0 => self.scheduler.ease_step = step,
                _ => {
                    tracing::warn!("MNEMO_EASE_STEP is not a positive number: {}", val);
                }
            }
        }

        if let Ok(val) = env::var("MNEMO_DISTRACTOR_COUNT") {
            match val.parse::<usize>() {
                Ok(count) => self.quiz.distractor_count = count,
                Err(_) => {
                    tracing::warn!("MNEMO_DISTRACTOR_COUNT is not a number: {}", val);
                }
            }
        }
    }

    /// Repair nonsensical scheduler values, warning about each.
    fn validate(&mut self) {
        let defaults = SchedulerParams::default();
        if self.scheduler.min_ease > self.scheduler.max_ease {
            tracing::warn!(
                "min_ease {} exceeds max_ease {}, reverting ease bounds to defaults",
                self.scheduler.min_ease,
                self.scheduler.max_ease
            );
            self.scheduler.min_ease = defaults.min_ease;
            self.scheduler.max_ease = defaults.max_ease;
        }
        if self.scheduler.min_ease < 1.0 {
            tracing::warn!(
                "min_ease {} would shrink intervals, reverting to {}",
                self.scheduler.min_ease,
                defaults.min_ease
            );
            self.scheduler.min_ease = defaults.min_ease;
        }
    }
}

/// Get the mnemo home directory.
///
/// `$MNEMO_HOME` when set and absolute, otherwise `~/.mnemo`.
pub fn mnemo_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("MNEMO_HOME") {
        if home.is_empty() {
            tracing::warn!("MNEMO_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("MNEMO_HOME is not usable: {}, using default", home);
        }
    }
    dirs::home_dir().map(|h| h.join(".mnemo"))
}

/// Get the study data directory (`<mnemo_home>/data`).
pub fn data_dir() -> Option<PathBuf> {
    mnemo_home().map(|h| h.join("data"))
}

/// Get the user config path (`<mnemo_home>/config.toml`).
pub fn user_config_path() -> Option<PathBuf> {
    mnemo_home().map(|h| h.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scheduler.lapse_delay_minutes, 10);
        assert_eq!(config.scheduler.first_interval_days, 1);
        assert_eq!(config.scheduler.second_interval_days, 6);
        assert!((config.scheduler.ease_step - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.quiz.distractor_count, 3);
    }

    #[test]
    fn test_load_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[scheduler]
lapse_delay_minutes = 5
ease_step = 0.2

[quiz]
distractor_count = 5
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.scheduler.lapse_delay_minutes, 5);
        assert!((config.scheduler.ease_step - 0.2).abs() < f64::EPSILON);
        // Unspecified fields keep their defaults.
        assert_eq!(config.scheduler.second_interval_days, 6);
        assert_eq!(config.quiz.distractor_count, 5);
    }

    #[test]
    fn test_load_from_path_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "not [ valid toml").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, MnemoError::Config { .. }));
    }

    #[test]
    fn test_load_for_dir_prefers_project_config() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join(".mnemo");
        fs::create_dir_all(&project).unwrap();
        fs::write(
            project.join("config.toml"),
            "[scheduler]\nfirst_interval_days = 2\n",
        )
        .unwrap();

        let config = Config::load_for_dir(temp.path());
        assert_eq!(config.scheduler.first_interval_days, 2);
    }

    #[test]
    fn test_validate_repairs_inverted_ease_bounds() {
        let mut config = Config::default();
        config.scheduler.min_ease = 3.0;
        config.scheduler.max_ease = 2.0;
        config.validate();

        assert!((config.scheduler.min_ease - 1.3).abs() < f64::EPSILON);
        assert!((config.scheduler.max_ease - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_repairs_shrinking_ease() {
        let mut config = Config::default();
        config.scheduler.min_ease = 0.5;
        config.validate();
        assert!((config.scheduler.min_ease - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    #[serial]
    fn test_env_override_lapse_delay() {
        env::set_var("MNEMO_LAPSE_DELAY_MINUTES", "20");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.scheduler.lapse_delay_minutes, 20);

        env::remove_var("MNEMO_LAPSE_DELAY_MINUTES");
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_value_ignored() {
        env::set_var("MNEMO_LAPSE_DELAY_MINUTES", "soon");
        env::set_var("MNEMO_EASE_STEP", "-1");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.scheduler.lapse_delay_minutes, 10);
        assert!((config.scheduler.ease_step - 0.15).abs() < f64::EPSILON);

        env::remove_var("MNEMO_LAPSE_DELAY_MINUTES");
        env::remove_var("MNEMO_EASE_STEP");
    }

    #[test]
    #[serial]
    fn test_mnemo_home_env_override() {
        env::set_var("MNEMO_HOME", "/tmp/mnemo-test-home");
        assert_eq!(mnemo_home(), Some(PathBuf::from("/tmp/mnemo-test-home")));
        assert_eq!(
            data_dir(),
            Some(PathBuf::from("/tmp/mnemo-test-home/data"))
        );
        env::remove_var("MNEMO_HOME");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, back);
    }
}
