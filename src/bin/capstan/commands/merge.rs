//! `capstan merge` command

use anyhow::{Context, Result};

use crate::cli::MergeArgs;
use capstan::ops::merge_manifest_text;

pub fn execute(args: MergeArgs) -> Result<()> {
    let base = std::fs::read_to_string(&args.base)
        .with_context(|| format!("failed to read {}", args.base.display()))?;
    let incoming = std::fs::read_to_string(&args.incoming)
        .with_context(|| format!("failed to read {}", args.incoming.display()))?;

    let merged = merge_manifest_text(&base, &incoming)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &merged)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("    Merged into {}", path.display());
        }
        None => print!("{}", merged),
    }

    Ok(())
}
