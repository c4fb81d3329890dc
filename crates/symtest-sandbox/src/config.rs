//! Engine configuration: container image, mount points, in-container paths.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the symbolic-execution engine container is launched.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Container CLI, optionally with leading arguments (e.g. `sudo docker`).
    pub docker_command: String,
    /// Engine image.
    pub image: String,
    /// Where the project root is mounted inside the container.
    pub project_mount: String,
    /// Where the scratch directory is mounted inside the container.
    pub work_mount: String,
    /// Engine entry point inside the image.
    pub engine_entry: String,
    /// Environment variable naming the engine's own output file.
    pub engine_output_env: String,
    /// File name of the engine's own output, under `work_mount`. Not consumed.
    pub engine_output_file: String,
    /// Cycle-safe JSON encoder shipped in the image, required by the driver.
    pub safe_json_module: String,
    /// Wall-clock limit for one engine run. None = wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            docker_command: "docker".to_string(),
            image: "ayankovsky/expose:latest".to_string(),
            project_mount: "/project".to_string(),
            work_mount: "/work".to_string(),
            engine_entry: "/source/expoSE".to_string(),
            engine_output_env: "EXPOSE_JSON_PATH".to_string(),
            engine_output_file: "output.json".to_string(),
            safe_json_module: "/source/Analyser/bin/Utilities/SafeJson.js".to_string(),
            timeout_secs: None,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Container-side path of a file in the scratch directory.
    pub fn work_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.work_mount.trim_end_matches('/'), file_name)
    }
}
