use std::{
    io,
    path::{Path, PathBuf},
};

/// Remove `paths`, reporting each result. A file that is already gone counts
/// as removed. Failures are logged and returned, never raised.
pub fn cleanup<P: AsRef<Path>>(paths: &[P]) -> Vec<(PathBuf, io::Result<()>)> {
    paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            let res = match std::fs::remove_file(p) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            };
            if let Err(e) = &res {
                tracing::warn!(path = %p.display(), error = %e, "temp cleanup failed");
            }
            (p.to_path_buf(), res)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/handler/cleanup.rs"]
mod tests;
