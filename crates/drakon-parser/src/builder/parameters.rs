//! The `parameters` attribute of the `drakon` block.
//!
//! Parameters may be written as text, a list of lines or an object. The
//! object form accepts `id`, `text`, `lines`, `title`, `caption` and
//! `anchor`; any other scalar entries become `key = value` label lines when
//! nothing better describes the node.

use drakon_core::{
    semantic::{DiagramNode, NodeKind},
    value::{Attributes, BlockStatement, Value},
};

use crate::text::normalize_multiline;

const DEFAULT_ID: &str = "parameters";
const DEFAULT_LABEL: &str = "Parameters";

/// Keys that never contribute `key = value` label lines.
const DESCRIPTIVE_KEYS: [&str; 7] = ["anchor", "tags", "data", "text", "lines", "title", "caption"];

/// Renders a parameter entry for a `key = value` label line.
fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Str(s) => s.clone(),
        Value::Num(_) | Value::Bool(_) => value.to_string(),
        Value::List(items) => format!(
            "[{}]",
            items.iter().map(format_scalar).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(_) | Value::Nested(_) => value.to_json(),
    }
}

fn stringify_list(items: &[Value]) -> Value {
    Value::List(items.iter().map(|item| Value::Str(item.to_string())).collect())
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Marks parameter attributes implicit and fills in the anchor.
fn ensure_attributes(mut attributes: Attributes, anchor_base: &str) -> Attributes {
    attributes.insert("implicit".to_string(), Value::Bool(true));

    let anchor = attributes
        .get("anchor")
        .and_then(Value::as_trimmed_str)
        .map_or_else(|| format!("{anchor_base}@parameters"), str::to_string);
    attributes.insert("anchor".to_string(), Value::Str(anchor));

    if let Some(Value::Str(text)) = attributes.get_mut("text") {
        *text = normalize_multiline(text);
    }
    if let Some(Value::List(items)) = attributes.get("lines") {
        let lines = stringify_list(items);
        attributes.insert("lines".to_string(), lines);
    }
    attributes
}

fn text_attributes(label: &str, anchor_base: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("text".to_string(), Value::from(label));
    ensure_attributes(attributes, anchor_base)
}

/// The label for an object-form parameter value.
fn object_label(config: &Attributes) -> String {
    if let Some(text) = config.get("text").and_then(Value::as_str).filter(|t| !t.is_empty()) {
        return text.to_string();
    }
    if let Some(lines) = config.get("lines").and_then(Value::as_list).filter(|l| !l.is_empty()) {
        return lines.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
    }
    for key in ["title", "caption"] {
        if let Some(text) = config.get(key).and_then(Value::as_trimmed_str) {
            return text.to_string();
        }
    }

    let informative: Vec<String> = config
        .iter()
        .filter(|(key, _)| !DESCRIPTIVE_KEYS.contains(&key.as_str()))
        .map(|(key, entry)| format!("{key} = {}", format_scalar(entry)))
        .collect();
    if informative.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        informative.join("\n")
    }
}

/// Builds the parameters node, or `None` when the value is null.
pub(super) fn build_parameters_node(value: &Value, anchor_base: &str) -> Option<DiagramNode> {
    let (id, label, attributes) = match value {
        Value::Null => return None,
        Value::Str(s) => {
            let label = non_empty(normalize_multiline(s)).unwrap_or_else(|| DEFAULT_LABEL.to_string());
            let attributes = text_attributes(&label, anchor_base);
            (DEFAULT_ID.to_string(), label, attributes)
        }
        Value::List(items) => {
            let lines: Vec<String> = items.iter().map(ToString::to_string).collect();
            let label = non_empty(lines.join("\n")).unwrap_or_else(|| DEFAULT_LABEL.to_string());
            let mut attributes = Attributes::new();
            attributes.insert(
                "lines".to_string(),
                Value::List(lines.into_iter().map(Value::Str).collect()),
            );
            (DEFAULT_ID.to_string(), label, ensure_attributes(attributes, anchor_base))
        }
        Value::Object(source) => {
            let mut config: Attributes = source
                .iter()
                .map(|(key, entry)| {
                    let entry = match entry {
                        Value::Str(s) if matches!(key.as_str(), "text" | "title" | "caption") => {
                            Value::Str(normalize_multiline(s))
                        }
                        Value::List(items) => stringify_list(items),
                        other => other.clone(),
                    };
                    (key.clone(), entry)
                })
                .collect();

            let id = config
                .get("id")
                .and_then(Value::as_trimmed_str)
                .unwrap_or(DEFAULT_ID)
                .to_string();
            config.shift_remove("id");

            let label = object_label(&config);
            let mut attributes = ensure_attributes(config, anchor_base);
            if !attributes.contains_key("text") {
                attributes.insert("text".to_string(), Value::from(label.as_str()));
            }
            (id, label, attributes)
        }
        other => {
            let label = non_empty(normalize_multiline(&other.to_string())).unwrap_or_else(|| DEFAULT_LABEL.to_string());
            let attributes = text_attributes(&label, anchor_base);
            (DEFAULT_ID.to_string(), label, attributes)
        }
    };

    let block = BlockStatement::synthetic("parameters", vec![id.clone()]);
    Some(DiagramNode::new(id, NodeKind::Parameters, label, attributes, block))
}
