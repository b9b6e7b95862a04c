//! Bulk import, single-event autofill, and export.
//!
//! Import is all-or-nothing: when any item in a pasted batch fails
//! validation, nothing is imported and the errors of every failing item are
//! returned together. A JSON parse failure is reported as one message and
//! the structural validator never runs.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use content_core::GameEvent;

use crate::validator::check_event;

/// Why a pasted document could not be imported.
#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    /// The text was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Parse(String),
    /// Well-formed JSON that violates the event shape; one path-qualified
    /// message per violation, across every failing batch item.
    #[error("{} schema violation(s)", .0.len())]
    Schema(Vec<String>),
    /// Autofill was handed an array; it takes exactly one event object.
    #[error("expected a single event object, not an array")]
    ExpectedSingleObject,
}

/// Parse and validate a pasted document holding one event object or an
/// array of them. Returns every event only when every item passes.
pub fn import_events(text: &str) -> Result<Vec<GameEvent>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;

    // Array items are rooted at `events[i]` even for a one-element array,
    // so the caller can tell which item was rejected.
    let (items, batched) = match value {
        Value::Array(items) => (items, true),
        single => (vec![single], false),
    };

    let mut errors = Vec::new();
    let mut events = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = if batched {
            format!("events[{i}]")
        } else {
            "event".to_string()
        };
        let mut item_errors = Vec::new();
        check_event(&path, item, &mut item_errors);
        if item_errors.is_empty() {
            match serde_json::from_value::<GameEvent>(item.clone()) {
                Ok(event) => events.push(event),
                Err(e) => errors.push(format!("{path}: {e}")),
            }
        } else {
            errors.append(&mut item_errors);
        }
    }

    if !errors.is_empty() {
        warn!(
            rejected = items.len(),
            errors = errors.len(),
            "import batch rejected"
        );
        return Err(ImportError::Schema(errors));
    }
    debug!(imported = events.len(), "import batch accepted");
    Ok(events)
}

/// Parse and validate exactly one event object, for overwriting the current
/// draft in place. Arrays are rejected outright.
pub fn autofill_event(text: &str) -> Result<GameEvent, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;
    if value.is_array() {
        return Err(ImportError::ExpectedSingleObject);
    }

    let mut errors = Vec::new();
    check_event("event", &value, &mut errors);
    if !errors.is_empty() {
        return Err(ImportError::Schema(errors));
    }
    serde_json::from_value(value).map_err(|e| ImportError::Schema(vec![format!("event: {e}")]))
}

/// Serialize the event list back to the import shape. `import(export(x))`
/// reproduces `x`.
pub fn export_events(events: &[GameEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(events)
}
