use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use symtest_core::cli::{Cli, Command, GenerateArgs};
use symtest_core::generate::TestGenerator;
use symtest_sandbox::container::DockerRunner;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let cwd = std::env::current_dir().map_err(|e| anyhow!("reading current directory: {e}"))?;
    let request = args.to_request(&cwd);

    let generator =
        TestGenerator::new(DockerRunner::new(&config), config).keep_scratch(args.keep_scratch);
    let report = generator.generate_test(&request).await?;

    println!(
        "Finished generating test cases, total time taken: {} ms",
        report.elapsed.as_millis()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => generate(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Error messages already embed their causes.
            error!("{e}");
            ExitCode::from(1)
        }
    }
}
