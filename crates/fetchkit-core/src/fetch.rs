//! File download with overwrite and directory-creation policy.
//!
//! The decision tree runs entirely before any network I/O: a missing parent
//! directory (with `make_dir` off) or an existing destination (with
//! `overwrite` off) short-circuits into a skip outcome. Bodies are written
//! to a `.part` temp file and renamed over the destination only after the
//! GET succeeds, so a failed transfer never clobbers an existing file.

use crate::http::{self, HttpError, HttpOptions};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary file suffix used before the final rename.
const TEMP_SUFFIX: &str = ".part";

/// Policy flags for a single fetch. Both default to off: never overwrite,
/// never create directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Replace the destination file if it already exists.
    pub overwrite: bool,
    /// Create the destination's parent directories if missing.
    pub make_dir: bool,
}

/// How a fetch concluded without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The resource was downloaded to `path`.
    Downloaded { path: PathBuf, bytes: u64 },
    /// The parent directory is missing and `make_dir` was off; nothing was
    /// created and no network I/O happened.
    SkippedMissingDir { dir: PathBuf },
    /// The destination already exists and `overwrite` was off; the file is
    /// untouched and no network I/O happened.
    SkippedExisting { path: PathBuf },
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Downloaded { path, bytes } => {
                write!(f, "downloaded {} bytes to {}", bytes, path.display())
            }
            FetchOutcome::SkippedMissingDir { dir } => write!(
                f,
                "directory {} does not exist; not downloading (enable make_dir to create it)",
                dir.display()
            ),
            FetchOutcome::SkippedExisting { path } => write!(
                f,
                "{} already exists; not downloading (enable overwrite to replace it)",
                path.display()
            ),
        }
    }
}

/// Why a fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// `make_dir` was on but the parent directory could not be created.
    /// Aborts the fetch; a download into a directory that could not be
    /// created has nowhere to land.
    #[error("could not create directory {}: {}", .dir.display(), .source)]
    CreateDir { dir: PathBuf, source: io::Error },
    /// The GET itself failed (transport error or non-2xx status).
    #[error("download of {url} failed: {source}")]
    Network { url: String, source: HttpError },
    /// The body could not be written to disk.
    #[error("could not write {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },
}

/// Downloads `url` to `dest`, honoring the overwrite and directory-creation
/// flags in `opts`.
///
/// Precondition order: the parent directory is checked (and created when
/// `make_dir` is on) before the destination's existence, which is checked
/// before any network I/O. An existing destination with `overwrite` off is
/// left byte-for-byte unchanged.
pub fn fetch_url(
    url: &str,
    dest: &Path,
    opts: &FetchOptions,
    http: &HttpOptions,
) -> Result<FetchOutcome, FetchError> {
    // A bare filename has an empty parent; treat that as the current dir.
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !parent.is_dir() {
        if !opts.make_dir {
            tracing::debug!(
                "parent {} missing and make_dir off, skipping {}",
                parent.display(),
                url
            );
            return Ok(FetchOutcome::SkippedMissingDir { dir: parent });
        }
        tracing::info!("creating directory {}", parent.display());
        fs::create_dir_all(&parent).map_err(|source| FetchError::CreateDir {
            dir: parent.clone(),
            source,
        })?;
    }

    if dest.exists() && !opts.overwrite {
        tracing::debug!("{} exists and overwrite off, skipping {}", dest.display(), url);
        return Ok(FetchOutcome::SkippedExisting {
            path: dest.to_path_buf(),
        });
    }

    let bytes = download(url, dest, http)?;
    Ok(FetchOutcome::Downloaded {
        path: dest.to_path_buf(),
        bytes,
    })
}

/// Streams the GET body into `dest.part`, then renames over `dest`.
/// The temp file is removed on any failure.
fn download(url: &str, dest: &Path, http: &HttpOptions) -> Result<u64, FetchError> {
    let temp = temp_path(dest);
    let mut file = fs::File::create(&temp).map_err(|source| FetchError::Io {
        path: temp.clone(),
        source,
    })?;

    let mut written: u64 = 0;
    let mut write_err: Option<io::Error> = None;
    let result = http::get(url, http, |chunk| match file.write_all(chunk) {
        Ok(()) => {
            written += chunk.len() as u64;
            true
        }
        Err(e) => {
            write_err = Some(e);
            false
        }
    });

    if let Err(net_err) = result {
        let _ = fs::remove_file(&temp);
        // A sink abort shows up as a curl write error; report the real cause.
        return Err(match write_err {
            Some(source) => FetchError::Io { path: temp, source },
            None => FetchError::Network {
                url: url.to_string(),
                source: net_err,
            },
        });
    }

    if let Err(source) = file.sync_all() {
        let _ = fs::remove_file(&temp);
        return Err(FetchError::Io { path: temp, source });
    }
    drop(file);

    fs::rename(&temp, dest).map_err(|source| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    tracing::info!("downloaded {} bytes to {}", written, dest.display());
    Ok(written)
}

/// `dest` with the temp suffix appended (`data.csv` -> `data.csv.part`).
fn temp_path(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_owned();
    s.push(TEMP_SUFFIX);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    // A loopback URL that no fetch in these tests is allowed to reach; the
    // assertions on the outcome prove no connection was attempted.
    fn dead_url() -> String {
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        format!("http://127.0.0.1:{port}/file.csv")
    }

    #[test]
    fn temp_path_appends_part() {
        assert_eq!(
            temp_path(Path::new("/tmp/data.csv")).to_string_lossy(),
            "/tmp/data.csv.part"
        );
    }

    #[test]
    fn missing_parent_without_make_dir_skips() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("no/such/dir");
        let dest = parent.join("file.csv");

        let outcome =
            fetch_url(&dead_url(), &dest, &FetchOptions::default(), &HttpOptions::default())
                .unwrap();
        match outcome {
            FetchOutcome::SkippedMissingDir { dir } => assert_eq!(dir, parent),
            other => panic!("expected SkippedMissingDir, got {other:?}"),
        }
        assert!(!parent.exists());
    }

    #[test]
    fn existing_dest_without_overwrite_skips_and_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.csv");
        fs::write(&dest, b"original").unwrap();

        let outcome =
            fetch_url(&dead_url(), &dest, &FetchOptions::default(), &HttpOptions::default())
                .unwrap();
        assert!(matches!(outcome, FetchOutcome::SkippedExisting { .. }));
        assert_eq!(fs::read(&dest).unwrap(), b"original");
    }

    #[test]
    fn downloads_to_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.csv");
        let (url, handle) = serve_once("200 OK", "text/csv", b"a,b\n1,2\n".to_vec());

        let outcome =
            fetch_url(&url, &dest, &FetchOptions::default(), &HttpOptions::default()).unwrap();
        match outcome {
            FetchOutcome::Downloaded { path, bytes } => {
                assert_eq!(path, dest);
                assert_eq!(bytes, 8);
            }
            other => panic!("expected Downloaded, got {other:?}"),
        }
        assert_eq!(fs::read(&dest).unwrap(), b"a,b\n1,2\n");
        assert!(!temp_path(&dest).exists());
        handle.join().unwrap();
    }

    #[test]
    fn make_dir_creates_parents_then_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a/b/c/file.bin");
        let (url, handle) = serve_once("200 OK", "application/octet-stream", vec![7u8; 16]);

        let opts = FetchOptions {
            overwrite: false,
            make_dir: true,
        };
        let outcome = fetch_url(&url, &dest, &opts, &HttpOptions::default()).unwrap();
        assert!(matches!(outcome, FetchOutcome::Downloaded { bytes: 16, .. }));
        assert_eq!(fs::read(&dest).unwrap(), vec![7u8; 16]);
        handle.join().unwrap();
    }

    #[test]
    fn overwrite_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.csv");
        fs::write(&dest, b"old content").unwrap();
        let (url, handle) = serve_once("200 OK", "text/csv", b"new".to_vec());

        let opts = FetchOptions {
            overwrite: true,
            make_dir: false,
        };
        let outcome = fetch_url(&url, &dest, &opts, &HttpOptions::default()).unwrap();
        assert!(matches!(outcome, FetchOutcome::Downloaded { bytes: 3, .. }));
        assert_eq!(fs::read(&dest).unwrap(), b"new");
        handle.join().unwrap();
    }

    #[test]
    fn second_identical_fetch_skips_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.csv");
        let (url, handle) = serve_once("200 OK", "text/csv", b"payload".to_vec());

        let opts = FetchOptions::default();
        let first = fetch_url(&url, &dest, &opts, &HttpOptions::default()).unwrap();
        assert!(matches!(first, FetchOutcome::Downloaded { .. }));
        handle.join().unwrap();

        // The server is gone; a second network attempt would fail, so an Ok
        // skip proves none was made.
        let second = fetch_url(&url, &dest, &opts, &HttpOptions::default()).unwrap();
        assert!(matches!(second, FetchOutcome::SkippedExisting { .. }));
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn http_error_leaves_no_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.csv");
        let (url, handle) = serve_once("404 Not Found", "text/plain", b"nope".to_vec());

        let err = fetch_url(&url, &dest, &FetchOptions::default(), &HttpOptions::default())
            .unwrap_err();
        match err {
            FetchError::Network { source, .. } => {
                assert!(matches!(source, HttpError::Status { code: 404 }))
            }
            other => panic!("expected Network, got {other:?}"),
        }
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
        handle.join().unwrap();
    }

    #[test]
    fn failed_overwrite_preserves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.csv");
        fs::write(&dest, b"precious").unwrap();
        let (url, handle) = serve_once("503 Service Unavailable", "text/plain", Vec::new());

        let opts = FetchOptions {
            overwrite: true,
            make_dir: false,
        };
        let err = fetch_url(&url, &dest, &opts, &HttpOptions::default()).unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(fs::read(&dest).unwrap(), b"precious");
        handle.join().unwrap();
    }

    #[test]
    fn create_dir_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed makes create_dir_all fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let dest = blocker.join("sub/file.csv");

        let opts = FetchOptions {
            overwrite: false,
            make_dir: true,
        };
        let err = fetch_url(&dead_url(), &dest, &opts, &HttpOptions::default()).unwrap_err();
        assert!(matches!(err, FetchError::CreateDir { .. }));
    }

    #[test]
    fn outcome_display_names_the_condition() {
        let skipped = FetchOutcome::SkippedExisting {
            path: PathBuf::from("/tmp/x.csv"),
        };
        assert!(skipped.to_string().contains("overwrite"));

        let missing = FetchOutcome::SkippedMissingDir {
            dir: PathBuf::from("/tmp/nope"),
        };
        assert!(missing.to_string().contains("make_dir"));
    }
}
