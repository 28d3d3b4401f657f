use anyhow::Context;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "rsvp.toml";

// =============================================================================
// Event
// =============================================================================

/// Event details shown on the welcome page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Couple names, used as title and signature
    #[serde(default = "default_couple")]
    pub couple: String,
    /// Date line under the title
    #[serde(default = "default_date")]
    pub date: String,
    /// Invitation text on the welcome page
    #[serde(default = "default_welcome")]
    pub welcome: String,
}

fn default_couple() -> String {
    "Sofia & Zé Francisco".to_string()
}

fn default_date() -> String {
    "27 de Junho de 2026".to_string()
}

fn default_welcome() -> String {
    "Queridos Amigos, Tios e Família,\n\n\
     Gostávamos de contar com a vossa presença no dia 27 de Junho de 2026, \
     onde iremos celebrar o nosso Casamento. A Missa decorrerá na Igreja de \
     Nossa Senhora da Salvação, em Arruda dos Vinhos, e o jantar na Quinta da \
     Sardinha, em Marinhais.\n\n\
     Em breve daremos mais novidades e indicações.\n\n\
     Pedimos que preencham o formulário individualmente, por favor."
        .to_string()
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            couple: default_couple(),
            date: default_date(),
            welcome: default_welcome(),
        }
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Where responses go and how aggressively duplicates are suppressed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Spreadsheet ingestion endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Shared secret identifying this event to the endpoint
    #[serde(default = "default_token")]
    pub token: String,
    /// Trailing window during which the same email cannot submit again
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
    /// Completions faster than this are treated as automated
    #[serde(default = "default_min_fill_secs")]
    pub min_fill_secs: u64,
}

fn default_endpoint() -> String {
    "https://script.google.com/macros/s/AKfycbxXD04PFI0elHBzOJNJZqPHhXxFsN973qGSmSNg9CJqr8KUxzSGZ6hNOhhhuhFQh5iu1Q/exec".to_string()
}

fn default_token() -> String {
    "rsvp_2026_sofia_ze_francisco".to_string()
}

fn default_rate_limit_window_secs() -> u64 {
    300
}

fn default_min_fill_secs() -> u64 {
    10
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: default_token(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            min_fill_secs: default_min_fill_secs(),
        }
    }
}

fn seconds(key: &str, secs: u64) -> anyhow::Result<TimeDelta> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .with_context(|| format!("submission.{} is out of range: {}", key, secs))
}

impl SubmissionConfig {
    pub fn rate_limit_window(&self) -> anyhow::Result<TimeDelta> {
        seconds("rate_limit_window_secs", self.rate_limit_window_secs)
    }

    pub fn min_fill_time(&self) -> anyhow::Result<TimeDelta> {
        seconds("min_fill_secs", self.min_fill_secs)
    }

    /// Reject durations that do not fit a `TimeDelta`
    pub fn validate(&self) -> anyhow::Result<()> {
        self.rate_limit_window()?;
        self.min_fill_time()?;
        Ok(())
    }
}

// =============================================================================
// RSVP Configuration
// =============================================================================

/// Top-level configuration, read from `rsvp.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RsvpConfig {
    /// Rate-limit store location. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub event: EventConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl RsvpConfig {
    /// Load config from a file, or defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: RsvpConfig = toml::from_str(&content)?;
        config
            .submission
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Save config as pretty TOML
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved rate-limit store location
    pub fn store_path(&self) -> PathBuf {
        if let Some(path) = &self.store_path {
            return path.clone();
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("rsvp"))
            .unwrap_or_else(|| PathBuf::from(".rsvp"))
            .join("submissions.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = RsvpConfig::load(&temp.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.submission.rate_limit_window_secs, 300);
        assert_eq!(config.submission.min_fill_secs, 10);
        assert_eq!(config.submission.token, "rsvp_2026_sofia_ze_francisco");
        assert_eq!(config.event.couple, "Sofia & Zé Francisco");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "store_path = \"/tmp/rsvp.json\"\n\n[submission]\nmin_fill_secs = 3\n",
        )
        .unwrap();

        let config = RsvpConfig::load(&path).unwrap();
        assert_eq!(config.submission.min_fill_time().unwrap(), TimeDelta::seconds(3));
        assert_eq!(
            config.submission.rate_limit_window().unwrap(),
            TimeDelta::seconds(300)
        );
        assert_eq!(config.store_path(), PathBuf::from("/tmp/rsvp.json"));
        assert_eq!(config.event.date, "27 de Junho de 2026");
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(CONFIG_FILE);

        let mut config = RsvpConfig::default();
        config.submission.endpoint = "http://localhost:9999/exec".to_string();
        config.save(&path).unwrap();

        let loaded = RsvpConfig::load(&path).unwrap();
        assert_eq!(loaded.submission.endpoint, "http://localhost:9999/exec");
        assert!(loaded.store_path.is_none());
    }

    #[test]
    fn test_out_of_range_durations_are_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "[submission]\nrate_limit_window_secs = 10000000000000000\n",
        )
        .unwrap();

        let err = RsvpConfig::load(&path).unwrap_err();
        assert!(
            format!("{:#}", err).contains("rate_limit_window_secs"),
            "{:#}",
            err
        );

        let submission = SubmissionConfig {
            min_fill_secs: u64::MAX,
            ..Default::default()
        };
        assert!(submission.min_fill_time().is_err());
        assert!(submission.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[submission\nmin_fill_secs = ").unwrap();
        assert!(RsvpConfig::load(&path).is_err());
    }
}
