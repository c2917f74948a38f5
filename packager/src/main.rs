//! BLAST Windows packager CLI entrypoint.
//!
//! This binary stages a finished BLAST installation, compiles the NSIS
//! installer and moves it into `<install_dir>/installer`. Progress and errors
//! go to stderr; the optional directory listing goes to stdout.

use blast_win_packager::cli::Cli;
use blast_win_packager::compiler::SystemCommandExecutor;
use blast_win_packager::config::PackagerConfig;
use blast_win_packager::diagnostics::write_listing;
use blast_win_packager::error::{PackagerError, Result};
use blast_win_packager::manifest::Manifest;
use blast_win_packager::output::{success_message, write_line};
use blast_win_packager::pipeline::{PipelineContext, run_pipeline};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or(default_log_filter(verbose));
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let work_dir = resolve_work_dir(cli.work_dir.clone())?;
    let config = PackagerConfig::resolve(cli)?;
    let manifest = Manifest::blast();

    if cli.list_work_dir {
        write_listing(&work_dir, stdout)?;
    }

    let executor = match config.timeout {
        Some(timeout) => SystemCommandExecutor::with_timeout(timeout),
        None => SystemCommandExecutor::new(),
    };
    log::debug!("compiler {} with timeout {:?}", config.makensis, executor.timeout());
    let context = PipelineContext {
        version: &cli.release_version,
        install_dir: &cli.install_dir,
        work_dir: &work_dir,
        manifest: &manifest,
        config: &config,
        verbose: cli.verbose,
    };

    let installer = run_pipeline(&context, &executor, stderr)?;
    write_line(stderr, success_message(&cli.release_version, &installer));
    Ok(())
}

/// Uses the current directory when no working directory was given.
fn resolve_work_dir(work_dir: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(dir) = work_dir {
        return Ok(dir);
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| PackagerError::NonUtf8Path {
        what: "current directory",
        path: e.into_path_buf().display().to_string(),
    })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            1
        }
    }
}
