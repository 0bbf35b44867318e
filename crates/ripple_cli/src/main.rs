//! Ripple CLI — impacted-target detection for Bazel workspaces.
//!
//! `ripple generate-hashes` writes a snapshot of every target's digest, and
//! `ripple impacted-targets` compares two snapshots and lists the targets
//! that changed.

#![warn(missing_docs)]

mod generate;
mod impacted;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Ripple — find the build targets a change impacts.
#[derive(Parser, Debug)]
#[command(name = "ripple", version, about = "Impacted-target detection for Bazel workspaces")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `ripple.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hash every target in the workspace and write the snapshot as JSON.
    GenerateHashes(GenerateArgs),
    /// List targets whose digest differs between two snapshots.
    ImpactedTargets(ImpactedArgs),
}

/// Arguments for the `ripple generate-hashes` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// File to write the snapshot to.
    pub output: String,

    /// Workspace root (overrides `workspace.path`).
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Bazel executable (overrides `bazel.path`).
    #[arg(long)]
    pub bazel: Option<String>,

    /// Read targets from a captured `streamed_jsonproto` dump instead of
    /// running bazel.
    #[arg(long)]
    pub query_file: Option<String>,

    /// File listing seed paths, one per line.
    #[arg(short, long)]
    pub seed_filepaths: Option<String>,

    /// Hash only what bazel declares, ignoring on-disk source content.
    #[arg(long)]
    pub no_content_hashing: bool,
}

/// Arguments for the `ripple impacted-targets` subcommand.
#[derive(Parser, Debug)]
pub struct ImpactedArgs {
    /// Snapshot taken before the change.
    #[arg(long)]
    pub start: String,

    /// Snapshot taken after the change.
    #[arg(long)]
    pub end: String,

    /// Write the result to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format for the impacted target list.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Impacted-target output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One label per line.
    Text,
    /// A JSON array of labels.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::GenerateHashes(ref args) => generate::run(args, &global),
        Command::ImpactedTargets(ref args) => impacted::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the CLI flags.
fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_minimal() {
        let cli = Cli::parse_from(["ripple", "generate-hashes", "out.json"]);
        match cli.command {
            Command::GenerateHashes(ref args) => {
                assert_eq!(args.output, "out.json");
                assert!(args.workspace.is_none());
                assert!(args.bazel.is_none());
                assert!(args.query_file.is_none());
                assert!(args.seed_filepaths.is_none());
                assert!(!args.no_content_hashing);
            }
            _ => panic!("expected GenerateHashes command"),
        }
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "ripple",
            "generate-hashes",
            "--workspace",
            "/src/mono",
            "--bazel",
            "bazelisk",
            "--seed-filepaths",
            "seeds.txt",
            "--no-content-hashing",
            "hashes.json",
        ]);
        match cli.command {
            Command::GenerateHashes(ref args) => {
                assert_eq!(args.output, "hashes.json");
                assert_eq!(args.workspace.as_deref(), Some("/src/mono"));
                assert_eq!(args.bazel.as_deref(), Some("bazelisk"));
                assert_eq!(args.seed_filepaths.as_deref(), Some("seeds.txt"));
                assert!(args.no_content_hashing);
            }
            _ => panic!("expected GenerateHashes command"),
        }
    }

    #[test]
    fn parse_generate_from_query_file() {
        let cli = Cli::parse_from([
            "ripple",
            "generate-hashes",
            "--query-file",
            "graph.jsonl",
            "out.json",
        ]);
        match cli.command {
            Command::GenerateHashes(ref args) => {
                assert_eq!(args.query_file.as_deref(), Some("graph.jsonl"));
            }
            _ => panic!("expected GenerateHashes command"),
        }
    }

    #[test]
    fn parse_impacted() {
        let cli = Cli::parse_from([
            "ripple",
            "impacted-targets",
            "--start",
            "before.json",
            "--end",
            "after.json",
        ]);
        match cli.command {
            Command::ImpactedTargets(ref args) => {
                assert_eq!(args.start, "before.json");
                assert_eq!(args.end, "after.json");
                assert!(args.output.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected ImpactedTargets command"),
        }
    }

    #[test]
    fn parse_impacted_json_to_file() {
        let cli = Cli::parse_from([
            "ripple",
            "impacted-targets",
            "--start",
            "a.json",
            "--end",
            "b.json",
            "-o",
            "impacted.json",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::ImpactedTargets(ref args) => {
                assert_eq!(args.output.as_deref(), Some("impacted.json"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected ImpactedTargets command"),
        }
    }

    #[test]
    fn impacted_requires_both_snapshots() {
        assert!(Cli::try_parse_from(["ripple", "impacted-targets", "--start", "a.json"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "ripple",
            "--quiet",
            "--config",
            "/etc/ripple.toml",
            "generate-hashes",
            "out.json",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/etc/ripple.toml"));
    }

    #[test]
    fn log_level_follows_flags() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        assert_eq!(default_log_level(&global), "warn");
        global.verbose = true;
        assert_eq!(default_log_level(&global), "debug");
        global.quiet = true;
        assert_eq!(default_log_level(&global), "error");
    }
}
