//! Filename derivation for downloads that were not given a destination.
//!
//! Takes the last path segment of the URL and sanitizes it for Linux
//! filesystems.

/// Fallback when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe local filename from the last path segment of `url`.
///
/// Query strings and fragments are ignored. The result is sanitized (no
/// `/`, NUL, or control chars; no leading/trailing dots or spaces) and
/// falls back to `download.bin` when the URL has no usable path segment.
pub fn filename_from_url(url: &str) -> String {
    let candidate = match last_path_segment(url) {
        Some(seg) => seg,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize(&candidate);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Replaces path separators, NUL, whitespace, and control characters with
/// `_`, collapses runs of `_`, trims surrounding dots/spaces/underscores,
/// and caps the result at 255 bytes (NAME_MAX).
fn sanitize(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let keep = !(c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace());
        if keep {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_' || c == ' ');
    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
