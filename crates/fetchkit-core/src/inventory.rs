//! Directory inventory: immediate children of a directory with their sizes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One immediate child of an inventoried directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Bare file name, no directory components.
    pub file_name: String,
    /// The inventoried directory joined with the file name.
    pub file_path: PathBuf,
    /// Size in bytes as reported by the filesystem.
    pub file_size: u64,
}

/// Why a directory could not be inventoried.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The path does not exist.
    #[error("directory not found: {}", .path.display())]
    NotFound { path: PathBuf },
    /// The path exists but is not a directory.
    #[error("not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
    /// The directory exists but cannot be read.
    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },
    /// Any other filesystem failure while listing or sizing entries.
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },
}

/// Lists the immediate children of `dir` (files and subdirectories alike)
/// with their byte sizes.
///
/// Non-recursive; entry order is whatever the OS returns, not sorted. An
/// entry deleted between the listing and its size lookup is skipped with a
/// warning rather than failing the whole listing.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntryInfo>, InventoryError> {
    let read = fs::read_dir(dir).map_err(|e| classify_dir_error(dir, e))?;

    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| InventoryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_path = dir.join(entry.file_name());
        let file_size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("entry vanished during listing: {}", file_path.display());
                continue;
            }
            Err(source) => {
                return Err(InventoryError::Io {
                    path: file_path,
                    source,
                });
            }
        };
        entries.push(DirEntryInfo {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            file_path,
            file_size,
        });
    }

    Ok(entries)
}

fn classify_dir_error(dir: &Path, source: io::Error) -> InventoryError {
    let path = dir.to_path_buf();
    match source.kind() {
        io::ErrorKind::NotFound => InventoryError::NotFound { path },
        io::ErrorKind::NotADirectory => InventoryError::NotADirectory { path },
        io::ErrorKind::PermissionDenied => InventoryError::PermissionDenied { path },
        _ => InventoryError::Io { path, source },
    }
}
