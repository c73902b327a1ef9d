//! CLI definitions using clap derive API
//!
//! Only skiff's own options live here. Everything after the compose
//! subcommand is captured verbatim and classified by hand, so the
//! `--include`/`--exclude`/`--port` grammar and arbitrary compose options
//! never fight clap's parser.

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// skiff - service-filtering front-end for docker-compose
#[derive(Parser, Debug)]
#[command(
    name = "skiff",
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Run a docker-compose command against a subset of services",
    long_about = "skiff filters a compose file down to the services you ask for, optionally \
                  rewrites published ports, and hands the result to docker-compose with all \
                  other sections (networks, volumes, environment) untouched.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  skiff up -d                             \x1b[90m# Run all services\x1b[0m\n   \
                  skiff up -d --include web --include db  \x1b[90m# Run only web and db\x1b[0m\n   \
                  skiff up -d --exclude web               \x1b[90m# Run all services except web\x1b[0m\n   \
                  skiff -f custom.yml up --include redis  \x1b[90m# Use a custom compose file\x1b[0m\n   \
                  skiff up -d --port web:8080:80          \x1b[90m# Publish web's port 80 on host port 8080\x1b[0m\n\n\
                  --include and --exclude cannot be combined\n\
                  "
)]
pub struct Cli {
    /// Path to the compose file (probes docker-compose.yml, then
    /// docker-compose.yaml, when omitted)
    #[arg(long = "file", short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Compose binary to delegate to
    #[arg(
        long,
        value_name = "BIN",
        env = "SKIFF_COMPOSE_BIN",
        default_value = "docker-compose"
    )]
    pub compose_bin: String,

    /// Print the filtered compose document (or the pass-through command
    /// line) instead of executing it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Compose subcommand and its options; --include NAME, --exclude NAME
    /// and --port SERVICE:HOST_PORT:CONTAINER_PORT may be interleaved
    /// anywhere after the subcommand
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_plain_command() {
        let cli = Cli::try_parse_from(["skiff", "up", "-d"]).unwrap();
        assert_eq!(cli.tokens, ["up", "-d"]);
        assert_eq!(cli.file, None);
        assert_eq!(cli.compose_bin, "docker-compose");
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_parsing_compose_file() {
        let cli = Cli::try_parse_from(["skiff", "-f", "custom.yml", "up"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("custom.yml")));
        assert_eq!(cli.tokens, ["up"]);
    }

    #[test]
    fn test_cli_trailing_tokens_keep_hyphen_values() {
        let cli = Cli::try_parse_from([
            "skiff", "up", "-d", "--include", "web", "--port", "web:8080:80",
        ])
        .unwrap();
        assert_eq!(
            cli.tokens,
            ["up", "-d", "--include", "web", "--port", "web:8080:80"]
        );
    }

    #[test]
    fn test_cli_own_flags_after_subcommand_are_forwarded() {
        // Once the subcommand starts, even skiff's own flag names belong to
        // the compose invocation
        let cli = Cli::try_parse_from(["skiff", "up", "--dry-run"]).unwrap();
        assert!(!cli.dry_run);
        assert_eq!(cli.tokens, ["up", "--dry-run"]);
    }

    #[test]
    fn test_cli_dry_run_before_subcommand() {
        let cli = Cli::try_parse_from(["skiff", "--dry-run", "up"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.tokens, ["up"]);
    }

    #[test]
    fn test_cli_compose_bin_flag() {
        // The flag is tested instead of SKIFF_COMPOSE_BIN to avoid races with
        // tests that clear the variable; clap's env fallback is covered by
        // the integration suite.
        let cli = Cli::try_parse_from(["skiff", "--compose-bin", "podman-compose", "ps"]).unwrap();
        assert_eq!(cli.compose_bin, "podman-compose");
    }

    #[test]
    fn test_cli_no_tokens() {
        let cli = Cli::try_parse_from(["skiff"]).unwrap();
        assert!(cli.tokens.is_empty());
    }
}
