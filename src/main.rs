//! skiff - service-filtering front-end for docker-compose
//!
//! Loads a compose file, keeps only the services selected with
//! --include/--exclude, applies --port overrides, and pipes the result to
//! the compose binary, whose exit code becomes ours. With no directives the
//! original file and arguments are forwarded untouched.

use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};
use console::style;

mod cli;
mod compose;
mod directives;
mod error;
mod filter;
mod loader;
mod ports;
mod runner;

use cli::Cli;
use directives::{Directives, SkippedPortToken};
use error::Result;
use filter::SelectionRequest;

fn main() {
    let cli = Cli::parse();

    // No subcommand at all: show usage, fail
    if cli.tokens.is_empty() {
        let _ = Cli::command().print_help();
        process::exit(1);
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{} {}", style("Error:").red().bold(), err);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let subcommand = cli.tokens[0].clone();
    let directives = directives::classify(&cli.tokens[1..])?;

    // The include/exclude conflict is a configuration error; it must fire
    // before any file I/O
    let request =
        SelectionRequest::new(directives.include.clone(), directives.exclude.clone())?;

    let compose_file = loader::resolve_compose_file(cli.file.clone(), |path| path.exists())?;
    if cli.verbose {
        eprintln!("Using compose file: {}", compose_file.display());
    }

    if directives.any() {
        run_pipeline(&cli, &compose_file, &subcommand, &directives, &request)
    } else {
        run_passthrough(&cli, &compose_file)
    }
}

/// Forward the file path and original arguments verbatim; the document is
/// never parsed on this path
fn run_passthrough(cli: &Cli, compose_file: &Path) -> Result<i32> {
    let args = runner::passthrough_args(compose_file, &cli.tokens);

    if cli.dry_run {
        println!("{} {}", cli.compose_bin, args.join(" "));
        return Ok(0);
    }
    if cli.verbose {
        eprintln!("Running: {} {}", cli.compose_bin, args.join(" "));
    }

    runner::run(&cli.compose_bin, &args)
}

/// Load, filter, override, and hand the document to compose on stdin
fn run_pipeline(
    cli: &Cli,
    compose_file: &Path,
    subcommand: &str,
    directives: &Directives,
    request: &SelectionRequest,
) -> Result<i32> {
    let project = loader::load(compose_file)?;

    let (mut filtered, mut missing) = filter::select(project, request);
    missing.extend(ports::apply_overrides(&mut filtered, &directives.overrides));
    missing.sort();
    missing.dedup();

    report_warnings(&directives.skipped, &missing);

    let document = filtered.to_yaml()?;
    if cli.dry_run {
        print!("{document}");
        return Ok(0);
    }

    let args = runner::filtered_args(subcommand, &directives.cmd_options);
    if cli.verbose {
        eprintln!("Running: {} {}", cli.compose_bin, args.join(" "));
    }

    runner::run_with_stdin(&cli.compose_bin, &args, &document)
}

/// One consolidated warning block on stderr, after the transformation and
/// before the compose binary takes over
fn report_warnings(skipped: &[SkippedPortToken], missing: &[String]) {
    if !skipped.is_empty() {
        eprintln!(
            "{} invalid port mappings were skipped:",
            style("Warning:").yellow().bold()
        );
        for skipped_token in skipped {
            eprintln!("  - '{}': {}", skipped_token.token, skipped_token.reason);
        }
    }

    if !missing.is_empty() {
        eprintln!(
            "{} some requested services were not found in the compose file:",
            style("Warning:").yellow().bold()
        );
        for name in missing {
            eprintln!("  - {name}");
        }
    }
}
