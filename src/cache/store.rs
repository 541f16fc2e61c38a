use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::BoilerResult;

const EXTENSION: &str = "gif";

/// Cache key derived from subject ids and avatar content hashes.
///
/// Characters that could escape the cache directory are replaced with `-`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// `{subject}_{hash}`.
    pub fn single(subject_id: &str, avatar_hash: &str) -> Self {
        Self::from_parts(&[subject_id, avatar_hash])
    }

    /// `{a}_{b}_{hash_a}_{hash_b}`. Not symmetric: swapping roles yields a different key.
    pub fn pair(subject_a: &str, subject_b: &str, hash_a: &str, hash_b: &str) -> Self {
        Self::from_parts(&[subject_a, subject_b, hash_a, hash_b])
    }

    fn from_parts(parts: &[&str]) -> Self {
        let joined = parts
            .iter()
            .map(|p| sanitize(p))
            .collect::<Vec<_>>()
            .join("_");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Filesystem-backed cache of generated animations, one file per key.
///
/// The directory is expected to exist. There is no locking: concurrent
/// writers of the same key simply overwrite each other with identical output.
#[derive(Clone, Debug)]
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", key.as_str()))
    }

    /// Presence of the file is a hit.
    pub fn lookup(&self, key: &CacheKey) -> Option<PathBuf> {
        let path = self.path_for(key);
        path.is_file().then_some(path)
    }

    /// Copy a freshly generated file to the canonical path for `key`.
    pub fn store(&self, key: &CacheKey, src: &Path) -> BoilerResult<PathBuf> {
        let dest = self.path_for(key);
        std::fs::copy(src, &dest).with_context(|| {
            format!(
                "copy '{}' into cache as '{}'",
                src.display(),
                dest.display()
            )
        })?;
        tracing::info!(key = %key, path = %dest.display(), "saved to cache");
        Ok(dest)
    }

    /// Cached files whose key starts with `subject_id`.
    pub fn entries_for(&self, subject_id: &str) -> Vec<PathBuf> {
        let prefix = format!("{}_", sanitize(subject_id));
        let Ok(rd) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut out: Vec<PathBuf> = rd
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension().is_some_and(|e| e == EXTENSION)
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        out.sort();
        out
    }

    /// Remove every entry for `subject_id` other than `keep`.
    ///
    /// Best-effort: failures are logged and reported back, never raised.
    pub fn evict_stale(&self, subject_id: &str, keep: &CacheKey) -> Vec<(PathBuf, io::Result<()>)> {
        let keep_path = self.path_for(keep);
        self.entries_for(subject_id)
            .into_iter()
            .filter(|p| *p != keep_path)
            .map(|p| {
                let res = std::fs::remove_file(&p);
                match &res {
                    Ok(()) => tracing::info!(path = %p.display(), "removed old cache entry"),
                    Err(e) => {
                        tracing::warn!(path = %p.display(), error = %e, "failed to remove old cache entry")
                    }
                }
                (p, res)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
