// src/pipeline.rs

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, info_span};

use crate::{
    config::Config,
    document::{load_or_empty, write_document},
    merge::{merge_into, MergeSummary},
    table::{read_table, ReadStats},
};

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub destination: PathBuf,
    pub read: ReadStats,
    pub merge: MergeSummary,
}

/// Read the source table, merge it into the destination document and rewrite it.
///
/// Nothing is written unless every earlier stage succeeds.
pub fn run(cfg: &Config) -> Result<RunSummary> {
    let (table, read) = {
        let _span = info_span!("read", source = %cfg.source.display()).entered();
        read_table(&cfg.source)?
    };

    let mut doc = {
        let _span = info_span!("load", destination = %cfg.destination.display()).entered();
        load_or_empty(&cfg.destination, cfg.create_missing)?
    };

    let merge = {
        let _span = info_span!("merge").entered();
        let summary = merge_into(&mut doc, table).with_context(|| {
            format!(
                "merging {} into {}",
                cfg.source.display(),
                cfg.destination.display()
            )
        })?;
        info!(
            created = summary.groups_created,
            updated = summary.groups_updated,
            added = summary.items_added,
            overwritten = summary.items_overwritten,
            changed = summary.items_changed,
            "merged"
        );
        summary
    };

    {
        let _span = info_span!("write", destination = %cfg.destination.display()).entered();
        write_document(&doc, &cfg.destination)?;
    }

    Ok(RunSummary {
        destination: cfg.destination.clone(),
        read,
        merge,
    })
}
