use std::{
    io::ErrorKind,
    path::Path,
    process::{Command, Stdio},
};

/// Default external optimizer binary.
pub const GIFSICLE: &str = "gifsicle";

/// Settings passed to the external optimizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCompressConfig {
    /// `--optimize=<level>`.
    pub optimize_level: u8,
    /// `--lossy=<n>`; higher is smaller and lossier. `None` runs a lossless
    /// optimize pass only.
    pub lossy: Option<u32>,
    /// `--colors=<n>`.
    pub colors: u16,
}

impl PostCompressConfig {
    pub fn args(&self, path: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> =
            vec![format!("--optimize={}", self.optimize_level).into()];
        if let Some(lossy) = self.lossy {
            args.push(format!("--lossy={lossy}").into());
        }
        args.extend([
            format!("--colors={}", self.colors).into(),
            path.as_os_str().to_owned(),
            "-o".into(),
            path.as_os_str().to_owned(),
        ]);
        args
    }
}

/// What happened to the file. Never an error: the uncompressed output is
/// already valid on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostCompressOutcome {
    /// The optimizer binary is not on PATH.
    Unavailable,
    /// The optimizer ran but failed; the file is left as it was.
    Failed(String),
    Compressed { before: u64, after: u64 },
}

/// Re-compress `path` in place with `gifsicle`.
pub fn postcompress(path: &Path, cfg: &PostCompressConfig) -> PostCompressOutcome {
    postcompress_with(GIFSICLE, path, cfg)
}

/// Same as [`postcompress`] but with an explicit optimizer binary.
pub fn postcompress_with(binary: &str, path: &Path, cfg: &PostCompressConfig) -> PostCompressOutcome {
    let before = file_len(path);

    let output = Command::new(binary)
        .args(cfg.args(path))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(binary, "optimizer not found on PATH, skipping post-processing");
            return PostCompressOutcome::Unavailable;
        }
        Err(e) => {
            tracing::warn!(binary, error = %e, "failed to spawn optimizer (non-fatal)");
            return PostCompressOutcome::Failed(e.to_string());
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(
            binary,
            status = %output.status,
            stderr = %stderr,
            "optimizer failed (non-fatal)"
        );
        return PostCompressOutcome::Failed(format!("exited with {}: {stderr}", output.status));
    }

    let after = file_len(path);
    tracing::info!(before, after, "post-compressed output");
    PostCompressOutcome::Compressed { before, after }
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gifsicle.rs"]
mod tests;
