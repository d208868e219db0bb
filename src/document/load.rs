use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::{fs, io, path::Path};
use tracing::{info, warn};

use super::{json_type, Document};

/// Load the JSON store at `path`. The file must exist and hold a JSON object.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading document {}", path.display()))?;
    let doc =
        parse_document(&text).with_context(|| format!("parsing document {}", path.display()))?;
    info!(path = %path.display(), groups = doc.len(), "loaded document");
    Ok(doc)
}

/// Like `load_document`, but a missing file yields an empty document when
/// `create_missing` is set.
pub fn load_or_empty<P: AsRef<Path>>(path: P, create_missing: bool) -> Result<Document> {
    let path = path.as_ref();
    match load_document(path) {
        Ok(doc) => Ok(doc),
        Err(e) if create_missing && is_not_found(&e) => {
            warn!(path = %path.display(), "document not found; starting from an empty one");
            Ok(Document::new())
        }
        Err(e) => Err(e),
    }
}

/// Parse JSON text into a document. A leading byte-order mark is ignored.
pub fn parse_document(text: &str) -> Result<Document> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!(
            "expected a JSON object at the top level, found {}",
            json_type(&other)
        ),
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .map(|e| e.kind() == io::ErrorKind::NotFound)
        .unwrap_or(false)
}
