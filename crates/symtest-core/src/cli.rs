//! Command-line interface.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use symtest_sandbox::config::{ConfigError, EngineConfig};

use crate::generate::GenerateRequest;

#[derive(Debug, Parser)]
#[command(name = "symtest", version, about = "Generate Jest tests from symbolic execution runs")]
pub struct Cli {
    /// Log engine output and internal steps at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the engine against one call expression and write a test file.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project directory root.
    pub project_root: PathBuf,

    /// File to import the function under test from, relative to the project root.
    pub file_name: String,

    /// Call expression, e.g. `module.parse`.
    pub call_expression: String,

    /// Where to write the generated test file.
    pub output_path: PathBuf,

    /// Number of symbolic arguments the call expression takes.
    #[arg(default_value_t = 1)]
    pub args_number: usize,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Leave the scratch directory and engine artifacts in place.
    #[arg(long)]
    pub keep_scratch: bool,
}

/// Engine overrides. Unset flags fall back to the config file, then defaults.
#[derive(Debug, Args)]
pub struct EngineArgs {
    /// JSON file with engine settings.
    #[arg(long, env = "SYMTEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Engine container image.
    #[arg(long, env = "SYMTEST_ENGINE_IMAGE")]
    pub image: Option<String>,

    /// Container CLI, optionally with leading arguments.
    #[arg(long, env = "SYMTEST_DOCKER")]
    pub docker: Option<String>,

    /// Give up on the engine after this many seconds.
    #[arg(long, env = "SYMTEST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl EngineArgs {
    pub fn resolve(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(image) = &self.image {
            config.image = image.clone();
        }
        if let Some(docker) = &self.docker {
            config.docker_command = docker.clone();
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        Ok(config)
    }
}

impl GenerateArgs {
    /// Build the request, resolving paths against `cwd`.
    pub fn to_request(&self, cwd: &Path) -> GenerateRequest {
        GenerateRequest {
            project_root: absolutize(cwd, &self.project_root),
            file_path: self.file_name.clone(),
            call_expression: self.call_expression.clone(),
            output_path: absolutize(cwd, &self.output_path),
            args_number: self.args_number,
        }
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
