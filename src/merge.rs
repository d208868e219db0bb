// src/merge.rs

use anyhow::{bail, Result};
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{json_type, Document};
use crate::table::ParsedTable;

/// What a merge changed, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Groups that did not exist in the document and were appended.
    pub groups_created: usize,
    /// Existing groups that received at least one entry.
    pub groups_updated: usize,
    /// Items appended to a group (including every item of a created group).
    pub items_added: usize,
    /// Items whose key already existed and was overwritten.
    pub items_overwritten: usize,
    /// Overwritten items whose value actually differs from before.
    pub items_changed: usize,
}

impl MergeSummary {
    /// Whether the merge left the document exactly as it was.
    pub fn is_noop(&self) -> bool {
        self.groups_created == 0 && self.items_added == 0 && self.items_changed == 0
    }
}

/// Overlay `table` onto `doc` in place.
///
/// Existing groups are shallow-merged key by key: shared keys are
/// overwritten where they sit, new keys are appended, and every other key
/// is left alone. Groups missing from `doc` are appended whole. A group
/// whose current value is not a JSON object cannot be merged into and
/// fails the call before anything in `doc` is touched.
pub fn merge_into(doc: &mut Document, table: ParsedTable) -> Result<MergeSummary> {
    for list_name in table.keys() {
        if let Some(existing) = doc.get(list_name) {
            if !existing.is_object() {
                bail!(
                    "group {:?} in document is a {}, not an object",
                    list_name,
                    json_type(existing)
                );
            }
        }
    }

    let mut summary = MergeSummary::default();
    for (list_name, items) in table {
        match doc.get_mut(&list_name).and_then(Value::as_object_mut) {
            Some(group) => {
                summary.groups_updated += 1;
                for (item_key, text) in items {
                    match group.get_mut(&item_key) {
                        Some(slot) => {
                            summary.items_overwritten += 1;
                            if slot.as_str() != Some(text.as_str()) {
                                summary.items_changed += 1;
                                debug!(group = %list_name, item = %item_key, "overwriting item");
                                *slot = Value::String(text);
                            }
                        }
                        None => {
                            summary.items_added += 1;
                            group.insert(item_key, Value::String(text));
                        }
                    }
                }
            }
            None => {
                summary.groups_created += 1;
                summary.items_added += items.len();
                debug!(group = %list_name, items = items.len(), "adding group");
                let group: Map<String, Value> = items
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                doc.insert(list_name, Value::Object(group));
            }
        }
    }
    Ok(summary)
}
