//! Shape checks for import payloads.
//!
//! Pure functions over parsed JSON. Every violation becomes one human-readable
//! line naming the record kind, its 1-based position and the offending field.

use serde_json::{Map, Value};

/// The importable top-level keys, in the order they are checked.
pub const IMPORT_KEYS: [&str; 3] = ["categories", "workflows", "tools"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Category,
    Workflow,
    Tool,
}

impl RecordKind {
    fn label(self) -> &'static str {
        match self {
            RecordKind::Category => "Category",
            RecordKind::Workflow => "Workflow",
            RecordKind::Tool => "Tool",
        }
    }
}

/// Parse payload text and validate it. Malformed JSON yields a single error
/// and no further checks.
pub fn parse_and_validate(text: &str) -> Result<Value, Vec<String>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| vec![format!("Invalid JSON: {e}")])?;
    let errors = validate_payload(&value);
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

/// Validate a whole import payload. An empty result means valid.
pub fn validate_payload(value: &Value) -> Vec<String> {
    let Some(root) = value.as_object() else {
        return vec!["Root must be an object".to_string()];
    };

    let mut errors = Vec::new();
    let checks: [(&str, fn(&Value, usize) -> Vec<String>); 3] = [
        ("categories", validate_category),
        ("workflows", validate_workflow),
        ("tools", validate_tool),
    ];

    for (key, check) in checks {
        match present(root, key) {
            None => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    errors.extend(check(item, i + 1));
                }
            }
            Some(_) => errors.push(format!("'{key}' must be an array")),
        }
    }

    if IMPORT_KEYS.iter().all(|key| present(root, key).is_none()) {
        errors.push(
            "At least one of \"categories\", \"workflows\", or \"tools\" must be provided"
                .to_string(),
        );
    }

    errors
}

pub fn validate_category(item: &Value, index: usize) -> Vec<String> {
    let mut check = FieldCheck::new(RecordKind::Category.label(), index, item);
    check.required_str("id");
    check.required_str("name");
    check.optional_str("iconName");
    check.optional_number("toolCount");
    check.optional_str("description");
    check.optional_array("tools");
    check.errors
}

pub fn validate_workflow(item: &Value, index: usize) -> Vec<String> {
    let mut check = FieldCheck::new(RecordKind::Workflow.label(), index, item);
    check.required_str("id");
    check.required_str("name");
    check.optional_str("description");
    check.optional_str("iconName");
    check.optional_str("duration");
    check.optional_number("steps");
    check.optional_array("tags");
    if check.optional_array("journey") {
        let steps = item
            .get("journey")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for (step_index, step) in steps.iter().enumerate() {
            let label = format!("Workflow {index}, Step {}", step_index + 1);
            let mut step_check = FieldCheck::labelled(label, step);
            step_check.required_str("title");
            step_check.optional_str("description");
            step_check.optional_str("toolId");
            check.errors.extend(step_check.errors);
        }
    }
    check.errors
}

pub fn validate_tool(item: &Value, index: usize) -> Vec<String> {
    let mut check = FieldCheck::new(RecordKind::Tool.label(), index, item);
    check.required_str("id");
    check.required_str("name");
    check.required_str("category");
    check.optional_str("shortDescription");
    check.optional_str("longDescription");
    check.optional_str("url");
    check.optional_str("logoUrl");
    check.optional_str("pricing");
    check.optional_array("tags");
    check.optional_bool("isTrending");
    check.optional_number("likesCount");
    check.errors
}

/// `null` counts as absent, both at the root and on records.
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

struct FieldCheck<'a> {
    label: String,
    record: Option<&'a Map<String, Value>>,
    errors: Vec<String>,
}

impl<'a> FieldCheck<'a> {
    fn new(kind: &str, index: usize, item: &'a Value) -> Self {
        Self::labelled(format!("{kind} {index}"), item)
    }

    fn labelled(label: String, item: &'a Value) -> Self {
        Self {
            label,
            record: item.as_object(),
            errors: Vec::new(),
        }
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.record.and_then(|record| present(record, name))
    }

    fn required_str(&mut self, name: &str) {
        let ok = matches!(self.field(name), Some(Value::String(s)) if !s.is_empty());
        if !ok {
            self.errors.push(format!(
                "{}: Missing or invalid '{name}' field",
                self.label
            ));
        }
    }

    fn optional(&mut self, name: &str, expected: &str, ok: fn(&Value) -> bool) -> bool {
        match self.field(name) {
            None => false,
            Some(value) if ok(value) => true,
            Some(_) => {
                self.errors
                    .push(format!("{}: '{name}' must be {expected}", self.label));
                false
            }
        }
    }

    fn optional_str(&mut self, name: &str) {
        self.optional(name, "a string", Value::is_string);
    }

    fn optional_number(&mut self, name: &str) {
        self.optional(name, "a number", Value::is_number);
    }

    fn optional_bool(&mut self, name: &str) {
        self.optional(name, "a boolean", Value::is_boolean);
    }

    /// Returns true when the field is present and is an array.
    fn optional_array(&mut self, name: &str) -> bool {
        self.optional(name, "an array", Value::is_array)
    }
}
