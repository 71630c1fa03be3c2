//! `fetchkit ls <dir>` – list a directory with file sizes.

use anyhow::Result;
use fetchkit_core::inventory;
use std::path::Path;

pub fn run_ls(dir: &Path) -> Result<()> {
    let entries = inventory::list_dir(dir)?;
    if entries.is_empty() {
        println!("Directory is empty.");
        return Ok(());
    }

    println!("{:<32} {:<56} {}", "FILE_NAME", "FILE_PATH", "FILE_SIZE");
    for e in &entries {
        println!(
            "{:<32} {:<56} {}",
            e.file_name,
            e.file_path.display(),
            e.file_size
        );
    }
    Ok(())
}
