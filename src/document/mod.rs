pub mod load;
pub mod write;

pub use load::{load_document, load_or_empty, parse_document};
pub use write::{render_document, write_document};

use serde_json::Value;

/// The persisted text store: list_name → JSON value (normally an object of strings).
/// Key order follows the file on disk.
pub type Document = serde_json::Map<String, Value>;

/// Human-readable JSON type name for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
