use log::debug;
use serde_json::Value;

use crate::catalog::FieldCatalog;
use crate::error::ExtractError;

/// A resolved field, ready to be written as one `name,value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPair {
    pub name: String,
    pub value: String,
}

/// Walks `path` through nested objects and returns the scalar at its end.
///
/// Missing keys, arrays or objects at the final segment, and scalars reached
/// before the path is exhausted all resolve to `None`.
pub fn resolve<'a>(record: &'a Value, path: &[String]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;

    // `Value::get` with a string key only ever matches inside objects.
    let mut node = record;
    for segment in parents {
        node = node.get(segment.as_str())?;
    }

    match node.get(last.as_str())? {
        Value::Object(_) | Value::Array(_) => None,
        scalar => Some(scalar),
    }
}

/// Converts a resolved scalar to its output text, or `None` for null.
pub fn normalize(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Object(_) | Value::Array(_) => return None,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
    };
    Some(quote_if_punctuated(text))
}

/// Wraps the value in double quotes when it contains any ASCII punctuation.
/// Embedded quotes are left as they are.
pub fn quote_if_punctuated(text: String) -> String {
    if text.chars().any(|c| c.is_ascii_punctuation()) {
        format!("\"{}\"", text)
    } else {
        text
    }
}

/// Extracts every catalog field from every record, records first, then catalog order.
pub fn process(records: &[Value], catalog: &FieldCatalog) -> Result<Vec<ExtractedPair>, ExtractError> {
    let mut pairs = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let before = pairs.len();
        for field in catalog.fields() {
            if let Some(value) = resolve(record, &field.path).and_then(normalize) {
                pairs.push(ExtractedPair {
                    name: field.output_name.clone(),
                    value,
                });
            }
        }
        debug!("Record {}: {} fields extracted", index + 1, pairs.len() - before);
    }

    if pairs.is_empty() {
        return Err(ExtractError::NoParameters);
    }

    Ok(pairs)
}
