pub mod config;
pub mod document;
pub mod merge;
pub mod pipeline;
pub mod table;

pub use config::Config;
pub use document::Document;
pub use merge::{merge_into, MergeSummary};
pub use pipeline::{run, RunSummary};
pub use table::{ParsedTable, ReadStats};
