// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Check whether a file may be created or overwritten.
///
/// - missing file → Ok
/// - existing file and `force` → Ok
/// - existing file without `force` → ask on stdin
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "export cancelled: '{}' not overwritten",
            path.display()
        )))
    }
}

/// Create the output directory of a multi-file export and check each of
/// the files that will land in it.
pub(crate) fn prepare_dir(dir: &Path, files: &[&str], force: bool) -> AppResult<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(AppError::Export(format!(
            "'{}' exists and is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;

    for f in files {
        ensure_writable(&dir.join(f), force)?;
    }
    Ok(())
}
