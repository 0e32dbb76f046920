use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::config::OutputNaming;

/// Temp path the writer encodes into before renaming to `final_path`.
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| OutputNaming::STEM.to_string());
    final_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.{}", OutputNaming::TEMP_SUFFIX))
}

/// Remove a leftover temp file; missing files are fine.
pub fn remove_temp(temp_path: &Path) {
    let _ = fs::remove_file(temp_path);
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp image to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })
}

/// Move `temp_path` to `final_path`. Without `overwrite` this is a hard link, which fails
/// if `final_path` exists at that moment, followed by removing the temp name. The temp
/// file is left in place on error.
pub fn publish_temp(temp_path: &Path, final_path: &Path, overwrite: bool) -> Result<()> {
    if overwrite {
        return rename_temp_to_final(temp_path, final_path);
    }
    fs::hard_link(temp_path, final_path).with_context(|| {
        format!(
            "link temp image to final path without replacing ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })?;
    remove_temp(temp_path);
    Ok(())
}
