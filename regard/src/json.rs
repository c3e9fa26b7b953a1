//! Pretty JSON output with optional syntax highlighting.

use console::Style;
use serde::Serialize;
use serde_json::Value;

const INDENT: &str = "  ";

struct Palette {
    key: Style,
    string: Style,
    number: Style,
    literal: Style,
}

impl Palette {
    fn new() -> Self {
        Self {
            key: Style::new().blue().bold().force_styling(true),
            string: Style::new().green().force_styling(true),
            number: Style::new().cyan().force_styling(true),
            literal: Style::new().magenta().force_styling(true),
        }
    }
}

/// Pretty-print `value` as JSON, highlighted when `color` is set.
///
/// Without color this is `serde_json::to_string_pretty`; with color the text
/// is the same apart from the ANSI codes.
pub fn to_pretty_json<T: Serialize>(value: &T, color: bool) -> serde_json::Result<String> {
    if !color {
        return serde_json::to_string_pretty(value);
    }

    let value = serde_json::to_value(value)?;
    let mut out = String::new();
    write_value(&mut out, &value, 0, &Palette::new())?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, depth: usize, p: &Palette) -> serde_json::Result<()> {
    match value {
        Value::Null => out.push_str(&p.literal.apply_to("null").to_string()),
        Value::Bool(b) => out.push_str(&p.literal.apply_to(b).to_string()),
        Value::Number(n) => out.push_str(&p.number.apply_to(n).to_string()),
        Value::String(s) => {
            out.push_str(&p.string.apply_to(serde_json::to_string(s)?).to_string())
        }
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_value(out, item, depth + 1, p)?;
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                indent(out, depth + 1);
                out.push_str(&p.key.apply_to(serde_json::to_string(key)?).to_string());
                out.push_str(": ");
                write_value(out, item, depth + 1, p)?;
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push('}');
        }
    }

    Ok(())
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
