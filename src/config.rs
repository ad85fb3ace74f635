use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TaskdeskError;

pub const CONFIG_ENV: &str = "TASKDESK_CONFIG";

/// Longest a "created" notice may stay up.
pub const MAX_NOTICE_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name written into `createdBy` of everything this session creates.
    pub operator: String,
    pub task_notice_secs: u64,
    pub group_notice_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator: "Admin".to_string(),
            task_notice_secs: 3,
            group_notice_secs: 5,
        }
    }
}

impl Config {
    pub fn task_notice(&self) -> Duration {
        Duration::from_secs(self.task_notice_secs)
    }

    pub fn group_notice(&self) -> Duration {
        Duration::from_secs(self.group_notice_secs)
    }

    pub fn from_json(content: &str) -> Result<Self, TaskdeskError> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| TaskdeskError::config(format!("Invalid config: {e}")))?;
        if config.operator.trim().is_empty() {
            return Err(TaskdeskError::config("operator must not be empty"));
        }
        for (key, secs) in [
            ("task_notice_secs", config.task_notice_secs),
            ("group_notice_secs", config.group_notice_secs),
        ] {
            if secs > MAX_NOTICE_SECS {
                return Err(TaskdeskError::config(format!(
                    "{key} must be at most {MAX_NOTICE_SECS}, got {secs}"
                )));
            }
        }
        Ok(config)
    }
}

/// Load from `path`, else from `$TASKDESK_CONFIG`, else defaults.
pub fn load(path: Option<&Path>) -> Result<Config, TaskdeskError> {
    let from_env = env::var_os(CONFIG_ENV);
    let path = match (path, from_env.as_deref()) {
        (Some(p), _) => p,
        (None, Some(p)) => Path::new(p),
        (None, None) => return Ok(Config::default()),
    };
    let content = fs::read_to_string(path).map_err(|e| {
        TaskdeskError::config(format!("Cannot read config {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Config::from_json(&content)
}
