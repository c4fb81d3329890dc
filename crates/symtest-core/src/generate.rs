use std::path::PathBuf;
use std::time::{Duration, Instant};

use symtest_ir::parse::parse_test_cases;
use symtest_ir::record::TestCase;
use symtest_render::driver::{render_driver, DriverSpec};
use symtest_render::jest::{render_test_file, TestFile};
use symtest_sandbox::config::EngineConfig;
use symtest_sandbox::container::{EngineExit, EngineInvocation, EngineRunner};
use symtest_sandbox::workspace::{ScratchDir, DRIVER_FILE_NAME, LOG_FILE_NAME};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("scratch workspace error: {0}")]
    Workspace(#[from] symtest_sandbox::workspace::WorkspaceError),

    #[error("engine run failed: {0}")]
    Runner(#[from] symtest_sandbox::container::RunnerError),

    #[error("no engine output found at {}", path.display())]
    MissingLog { path: PathBuf },

    #[error("engine log error: {0}")]
    Parse(#[from] symtest_ir::parse::ParseError),

    #[error("failed to write test file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One `generate` command.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Absolute project root; mounted into the engine container.
    pub project_root: PathBuf,
    /// Target file, relative to the project root.
    pub file_path: String,
    pub call_expression: String,
    pub output_path: PathBuf,
    /// Number of symbolic arguments the call takes.
    pub args_number: usize,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub output_path: PathBuf,
    pub engine_exit: EngineExit,
    pub cases: Vec<TestCase>,
    pub artifacts_removed: usize,
    pub elapsed: Duration,
}

impl GenerateReport {
    pub fn error_cases(&self) -> usize {
        self.cases.iter().filter(|c| c.is_error()).count()
    }
}

/// Drives one engine run per request and turns its log into a test file.
pub struct TestGenerator<R> {
    runner: R,
    config: EngineConfig,
    keep_scratch: bool,
}

impl<R: EngineRunner> TestGenerator<R> {
    pub fn new(runner: R, config: EngineConfig) -> Self {
        Self {
            runner,
            config,
            keep_scratch: false,
        }
    }

    /// Leave the scratch directory and engine artifacts behind after the run.
    pub fn keep_scratch(mut self, keep: bool) -> Self {
        self.keep_scratch = keep;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the engine against `request` and write the generated test file.
    ///
    /// The scratch directory is removed on every exit path unless
    /// `keep_scratch` is set. A non-zero engine exit is only a warning;
    /// a missing log is fatal.
    pub async fn generate_test(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateReport, GenerateError> {
        let start = Instant::now();

        let mut scratch = ScratchDir::ensure(&request.project_root)?;
        scratch.set_keep(self.keep_scratch);

        let driver = render_driver(&DriverSpec {
            file_path: request.file_path.clone(),
            call_expression: request.call_expression.clone(),
            args_number: request.args_number,
            project_mount: self.config.project_mount.clone(),
            log_path: self.config.work_path(LOG_FILE_NAME),
            safe_json_module: self.config.safe_json_module.clone(),
        });
        let driver_path = scratch.write_driver(&driver)?;
        debug!(path = %driver_path.display(), "wrote driver script");

        let invocation = EngineInvocation::new(
            &self.config,
            &request.project_root,
            scratch.path(),
            DRIVER_FILE_NAME,
        );
        let engine_exit = self.runner.run(&invocation).await?;
        if !engine_exit.success() {
            warn!(code = ?engine_exit.code, "engine exited with non-zero status");
        }

        let log = scratch.read_log()?.ok_or_else(|| GenerateError::MissingLog {
            path: scratch.log_path(),
        })?;
        let cases = parse_test_cases(&log)?;
        info!(cases = cases.len(), "collected test cases");

        let text = render_test_file(&TestFile {
            file_path: &request.file_path,
            call_expression: &request.call_expression,
            cases: &cases,
        });
        std::fs::write(&request.output_path, text).map_err(|source| {
            GenerateError::WriteOutput {
                path: request.output_path.clone(),
                source,
            }
        })?;
        info!(path = %request.output_path.display(), "wrote test file");

        let cleanup = scratch.close()?;

        Ok(GenerateReport {
            output_path: request.output_path.clone(),
            engine_exit,
            cases,
            artifacts_removed: cleanup.artifacts_removed,
            elapsed: start.elapsed(),
        })
    }
}
