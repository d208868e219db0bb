pub mod read;

pub use read::{read_table, read_table_from_str};

use indexmap::IndexMap;

/// list_name → (item_key → text_value), in first-seen order.
pub type ParsedTable = IndexMap<String, IndexMap<String, String>>;

/// Field positions inside a source row.
pub const LIST_NAME_FIELD: usize = 0;
pub const ITEM_KEY_FIELD: usize = 1;
pub const TEXT_VALUE_FIELD: usize = 3;

/// Rows shorter than this are skipped.
pub const MIN_FIELDS: usize = 4;

/// One usable row of the source table. Field 2 carries editor notes and is never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub list_name: String,
    pub item_key: String,
    pub text_value: String,
}

impl Record {
    /// Build a record from raw fields, or `None` when the row is too short.
    pub fn from_fields<'a, I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() < MIN_FIELDS {
            return None;
        }
        Some(Self {
            list_name: fields[LIST_NAME_FIELD].to_string(),
            item_key: fields[ITEM_KEY_FIELD].to_string(),
            text_value: fields
                .get(TEXT_VALUE_FIELD)
                .map(|s| s.to_string())
                .unwrap_or_default(),
        })
    }
}

/// Counters gathered while reading the source table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Data rows seen after the header.
    pub rows_read: usize,
    /// Rows dropped for having fewer than four fields.
    pub rows_skipped: usize,
}

impl ReadStats {
    pub fn rows_used(&self) -> usize {
        self.rows_read - self.rows_skipped
    }
}

/// Insert a record, overwriting any earlier value for the same key.
pub fn insert_record(table: &mut ParsedTable, record: Record) {
    table
        .entry(record.list_name)
        .or_default()
        .insert(record.item_key, record.text_value);
}
