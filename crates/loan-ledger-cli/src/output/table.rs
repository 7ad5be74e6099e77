use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cell;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Array(rows) => print_rows(rows),
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_envelope(result, map),
            _ => println!("{}", field_table(map)),
        },
        _ => println!("{}", cell(value)),
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(no loans recorded)");
        return;
    };

    let keys: Vec<&String> = first.keys().collect();
    let mut builder = Builder::default();
    builder.push_record(keys.iter().map(|k| heading(k)));
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                keys.iter()
                    .map(|k| map.get(k.as_str()).map(cell).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    println!("{}", field_table(result));

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn field_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([heading(key), cell(val)]);
    }
    Table::from(builder)
}

/// `monthly_payment` -> `Monthly Payment`
fn heading(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        assert_eq!(heading("monthly_payment"), "Monthly Payment");
        assert_eq!(heading("id"), "Id");
    }

    #[test]
    fn test_field_table_contains_values() {
        let value = serde_json::json!({"id": 1, "borrower": "Cruz"});
        let rendered = field_table(value.as_object().unwrap()).to_string();
        assert!(rendered.contains("Borrower"));
        assert!(rendered.contains("Cruz"));
    }
}
