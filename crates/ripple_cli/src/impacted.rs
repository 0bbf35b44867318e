//! `ripple impacted-targets` — diff two snapshots.

use std::path::Path;

use ripple_hash::diff_snapshots;

use crate::pipeline::{read_snapshot, resolve_path};
use crate::{GlobalArgs, ImpactedArgs, ReportFormat};

/// Runs the `ripple impacted-targets` command. Returns exit code 0 on success.
pub fn run(args: &ImpactedArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let start = read_snapshot(Path::new(&args.start))?;
    let end = read_snapshot(Path::new(&args.end))?;
    let impacted = diff_snapshots(&start, &end);

    let rendered = match args.format {
        ReportFormat::Text => impacted
            .iter()
            .map(|name| format!("{name}\n"))
            .collect::<String>(),
        ReportFormat::Json => serde_json::to_string_pretty(&impacted)? + "\n",
    };

    match &args.output {
        Some(path) => {
            let path = resolve_path(&std::env::current_dir()?, path);
            std::fs::write(&path, rendered)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        }
        None => print!("{rendered}"),
    }

    if !global.quiet {
        eprintln!(
            "  Impacted {} of {} targets",
            impacted.len(),
            end.len()
        );
    }
    Ok(0)
}
