use crate::foundation::error::{MemeError, MemeResult};

/// Normalize and validate an image name relative to the image directory.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> MemeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MemeError::invalid("image paths must be relative"));
    }
    if s.trim().is_empty() {
        return Err(MemeError::invalid("missing 'from' parameter"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MemeError::invalid("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MemeError::invalid("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/path.rs"]
mod tests;
