//! `ripple generate-hashes` — hash every target and write a snapshot.
//!
//! 1. Resolve configuration, workspace and seed list
//! 2. Pick the query service (bazel or a captured dump)
//! 3. Compute the snapshot
//! 4. Write it as JSON

use std::path::PathBuf;

use ripple_common::OsFileSystem;
use ripple_hash::TargetHashingClient;
use ripple_query::{BazelQueryService, FileQueryService, QueryService};

use crate::pipeline::{load_settings, read_seed_list, resolve_path, write_snapshot};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `ripple generate-hashes` command. Returns exit code 0 on success.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(global)?;
    let config = &settings.config;

    // CLI paths are relative to the current directory, config paths to the
    // config file.
    let workspace = match &args.workspace {
        Some(path) => resolve_path(&cwd, path),
        None => config
            .workspace
            .path
            .as_deref()
            .map(|path| resolve_path(&settings.base_dir, path))
            .unwrap_or_else(|| settings.base_dir.clone()),
    };
    let query_file: Option<PathBuf> = match &args.query_file {
        Some(path) => Some(resolve_path(&cwd, path)),
        None => config
            .bazel
            .query_file
            .as_deref()
            .map(|path| resolve_path(&settings.base_dir, path)),
    };
    let seed_list: Option<PathBuf> = match &args.seed_filepaths {
        Some(path) => Some(resolve_path(&cwd, path)),
        None => config
            .hashing
            .seed_filepaths
            .as_deref()
            .map(|path| resolve_path(&settings.base_dir, path)),
    };

    let seeds = match &seed_list {
        Some(list) => read_seed_list(list, &workspace)?,
        None => Vec::new(),
    };

    let query: Box<dyn QueryService> = match &query_file {
        Some(path) => {
            if !global.quiet {
                eprintln!("   Reading {}", path.display());
            }
            Box::new(FileQueryService::new(path))
        }
        None => {
            if !global.quiet {
                eprintln!("  Querying {}", workspace.display());
            }
            let bazel = args.bazel.clone().unwrap_or_else(|| config.bazel.path.clone());
            Box::new(
                BazelQueryService::new(&workspace)
                    .with_bazel_path(bazel)
                    .with_startup_options(config.bazel.startup_options.clone())
                    .with_command_options(config.bazel.command_options.clone()),
            )
        }
    };

    let mut client = TargetHashingClient::new(query.as_ref(), &OsFileSystem);
    if config.hashing.content_hashing && !args.no_content_hashing {
        client = client.with_workspace(&workspace);
    }
    let snapshot = client.hash_all_targets(&seeds)?;

    let output = resolve_path(&cwd, &args.output);
    write_snapshot(&output, &snapshot)?;

    if !global.quiet {
        eprintln!(
            "    Hashed {} targets ({} seed files) -> {}",
            snapshot.len(),
            seeds.len(),
            output.display()
        );
    }
    Ok(0)
}
