//! Passthrough copy: files copied byte-for-byte from input to output

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::Site;

/// Copy each configured passthrough path (file or directory) from the input
/// directory to the same relative location in the output directory.
/// Returns the number of files copied.
pub fn copy_passthrough(site: &Site) -> Result<usize> {
    let mut copied = 0;

    for entry in &site.config.passthrough_copy {
        let source = site.input_dir.join(entry);
        if !source.exists() {
            tracing::debug!("Passthrough path {:?} does not exist, skipping", source);
            continue;
        }

        for file in WalkDir::new(&source)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = file.path().strip_prefix(&site.input_dir)?;
            copy_file(file.path(), &site.output_dir.join(relative))?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    tracing::debug!("Copied {:?} -> {:?}", from, to);
    Ok(())
}
