use anyhow::{Context, Result};
use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::info;

use super::Document;

/// Render the document as 2-space indented JSON with non-ASCII text left unescaped.
pub fn render_document(doc: &Document) -> Result<String> {
    serde_json::to_string_pretty(doc).context("serializing document")
}

/// Rewrite `path` with the rendered document.
///
/// The JSON goes to a temp file beside the real target and is renamed over
/// it, so a failed write never leaves a truncated store behind. A symlinked
/// destination is written through, not replaced. An existing target keeps
/// its permissions; a read-only one is refused.
pub fn write_document<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    let rendered = render_document(doc)?;

    let target = resolve_target(path)?;
    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| format!("inspecting destination {}", target.display()))
        }
    };
    if let Some(meta) = &existing {
        if meta.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "destination is read-only",
            ))
            .with_context(|| format!("writing document {}", target.display()));
        }
    }

    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(rendered.as_bytes())
        .with_context(|| format!("writing temp file {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("flushing temp file {}", tmp.path().display()))?;
    if let Some(meta) = existing {
        fs::set_permissions(tmp.path(), meta.permissions())
            .with_context(|| format!("copying permissions of {}", target.display()))?;
    }

    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing document {}", target.display()))?;

    info!(
        path = %path.display(),
        target = %target.display(),
        groups = doc.len(),
        bytes = rendered.len(),
        "wrote document"
    );
    Ok(())
}

/// The file a write to `path` should land on: symlinks followed, or `path`
/// itself when nothing exists there yet.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e).with_context(|| format!("resolving destination {}", path.display())),
    }
}
