//! JavaScript source literals for concrete values.

use serde_json::Value;
use symtest_ir::value::ConcreteValue;

/// Render a value as a compact JavaScript literal.
///
/// Strings, numbers and object keys use JSON encoding. `undefined` is kept
/// wherever it occurs, including as an object member.
pub fn render_literal(value: &ConcreteValue) -> String {
    let mut out = String::new();
    write_literal(&mut out, value);
    out
}

fn write_literal(out: &mut String, value: &ConcreteValue) {
    match value {
        ConcreteValue::Undefined => out.push_str("undefined"),
        ConcreteValue::Null => out.push_str("null"),
        ConcreteValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConcreteValue::Number(n) => out.push_str(&n.to_string()),
        ConcreteValue::String(s) => out.push_str(&json_string(s)),
        ConcreteValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_literal(out, item);
            }
            out.push(']');
        }
        ConcreteValue::Object(members) => {
            out.push('{');
            for (i, (key, member)) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&json_string(key));
                out.push(':');
                write_literal(out, member);
            }
            out.push('}');
        }
    }
}

fn json_string(s: &str) -> String {
    Value::from(s).to_string()
}

/// Escape text for embedding between single quotes in JavaScript source.
pub fn escape_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}
