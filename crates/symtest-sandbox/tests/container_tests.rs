use std::path::Path;

use symtest_sandbox::config::EngineConfig;
use symtest_sandbox::container::{DockerRunner, EngineExit, EngineInvocation, EngineRunner, RunnerError};

fn invocation(config: &EngineConfig) -> EngineInvocation {
    EngineInvocation::new(
        config,
        Path::new("/home/dev/app"),
        Path::new("/home/dev/app/.test-generator"),
        "test.js",
    )
}

#[test]
fn test_docker_args_layout() {
    let config = EngineConfig::default();
    let args = invocation(&config).docker_args();
    assert_eq!(
        args,
        vec![
            "run",
            "--rm",
            "-v",
            "/home/dev/app:/project",
            "-v",
            "/home/dev/app/.test-generator:/work",
            "-e",
            "EXPOSE_JSON_PATH=/work/output.json",
            "ayankovsky/expose:latest",
            "/source/expoSE",
            "/work/test.js",
        ]
    );
}

#[test]
fn test_host_path_lookup() {
    let config = EngineConfig::default();
    let inv = invocation(&config);
    assert_eq!(inv.host_path("/work"), Some(Path::new("/home/dev/app/.test-generator")));
    assert_eq!(inv.host_path("/project"), Some(Path::new("/home/dev/app")));
    assert_eq!(inv.host_path("/elsewhere"), None);
}

#[test]
fn test_command_line_includes_leading_args() {
    let config = EngineConfig {
        docker_command: "sudo  docker".to_string(),
        ..EngineConfig::default()
    };
    let runner = DockerRunner::new(&config);
    let line = runner.command_line(&invocation(&config));
    assert!(line.starts_with("sudo docker run --rm -v "));
}

#[test]
fn test_engine_exit_success() {
    assert!(EngineExit { code: Some(0) }.success());
    assert!(!EngineExit { code: Some(1) }.success());
    assert!(!EngineExit { code: None }.success());
}

#[tokio::test]
async fn test_empty_command_rejected() {
    let config = EngineConfig {
        docker_command: "   ".to_string(),
        ..EngineConfig::default()
    };
    let runner = DockerRunner::new(&config);
    let result = runner.run(&invocation(&config)).await;
    assert!(matches!(result, Err(RunnerError::EmptyCommand)));
}

#[tokio::test]
async fn test_missing_binary_is_spawn_error() {
    let config = EngineConfig {
        docker_command: "symtest-no-such-binary-xyz".to_string(),
        ..EngineConfig::default()
    };
    let runner = DockerRunner::new(&config);
    let result = runner.run(&invocation(&config)).await;
    assert!(matches!(result, Err(RunnerError::Spawn { .. })));
}

#[cfg(unix)]
mod unix {
    use super::*;

    fn script_config(dir: &Path, body: &str, timeout_secs: Option<u64>) -> EngineConfig {
        let script = dir.join("fake-docker.sh");
        std::fs::write(&script, body).unwrap();
        EngineConfig {
            docker_command: format!("sh {}", script.display()),
            timeout_secs,
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_runner_passes_docker_args() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("args.txt");
        let body = format!("echo \"$@\" > '{}'\necho engine says hi\n", out.display());
        let config = script_config(dir.path(), &body, None);

        let exit = DockerRunner::new(&config).run(&invocation(&config)).await.unwrap();
        assert!(exit.success());

        let recorded = std::fs::read_to_string(out).unwrap();
        assert!(recorded.starts_with("run --rm -v /home/dev/app:/project"));
        assert!(recorded.trim_end().ends_with("/source/expoSE /work/test.js"));
    }

    #[tokio::test]
    async fn test_runner_reports_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let config = script_config(dir.path(), "echo failing >&2\nexit 3\n", None);

        let exit = DockerRunner::new(&config).run(&invocation(&config)).await.unwrap();
        assert_eq!(exit, EngineExit { code: Some(3) });
    }

    #[tokio::test]
    async fn test_runner_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let config = script_config(dir.path(), "exec sleep 30\n", Some(1));

        let result = DockerRunner::new(&config).run(&invocation(&config)).await;
        assert!(matches!(result, Err(RunnerError::Timeout(_))));
    }
}
