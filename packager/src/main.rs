//! Vineflower packager CLI entrypoint.
//!
//! This binary packages the latest Vineflower release as a Debian archive,
//! or with `--dry-run` reports which release would be packaged.

use clap::Parser;
use log::info;
use std::io::Write;
use vineflower_packager::cli::Cli;
use vineflower_packager::command::{CommandExecutor, SystemCommandExecutor};
use vineflower_packager::error::Result;
use vineflower_packager::github::{GithubClient, ReleaseSource};
use vineflower_packager::logging::init_logging;
use vineflower_packager::output::{DryRunInfo, success_message, write_stderr_line};
use vineflower_packager::pipeline::{plan_release, run_pipeline};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.quiet);

    let client = GithubClient::with_timeout(&cli.repo, cli.timeout());
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &client, &SystemCommandExecutor, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(
    cli: &Cli,
    source: &dyn ReleaseSource,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<()> {
    // Dry-run mode: resolve the release without side effects
    if cli.dry_run {
        return run_dry(cli, source, stderr);
    }

    info!("packaging latest release of {}", cli.repo);
    let outcome = run_pipeline(&cli.pipeline_config(), source, executor, stderr)?;

    if !cli.quiet {
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, success_message(&outcome));
    }

    Ok(())
}

/// Resolves the release and prints what a full run would do.
fn run_dry(cli: &Cli, source: &dyn ReleaseSource, stderr: &mut dyn Write) -> Result<()> {
    let config = cli.pipeline_config();
    let (release, asset) = plan_release(source)?;
    let staging_dir = config.staging_dir();
    let control_path = config.control_path();
    let package_path = config.package_path(&release.raw_tag);

    let info = DryRunInfo {
        repository: &cli.repo,
        tag: &release.raw_tag,
        release_id: release.id,
        asset_name: asset.as_ref().map(|a| a.name.as_str()),
        staging_dir: &staging_dir,
        control_path: &control_path,
        package_path: &package_path,
    };
    write_stderr_line(stderr, info.display_text());
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
