use serde_json::Value;

/// Fields worth printing on their own, most useful first.
const PRIORITY_KEYS: [&str; 5] = [
    "monthly_payment",
    "total_paid",
    "recycled_ids",
    "removed",
    "id",
];

/// Print just the key answer: one line per loan for lists, otherwise the
/// first priority field present.
pub fn print_minimal(value: &Value) {
    match value {
        Value::Array(rows) => {
            for row in rows {
                println!("{}", summarise_row(row));
            }
        }
        _ => {
            let result_obj = value
                .as_object()
                .and_then(|m| m.get("result"))
                .unwrap_or(value);
            println!("{}", pick_key_field(result_obj));
        }
    }
}

fn summarise_row(row: &Value) -> String {
    match (row.get("id"), row.get("borrower"), row.get("monthly_payment")) {
        (Some(id), Some(name), Some(monthly)) => format!(
            "{}\t{}\t{}",
            format_minimal(id),
            format_minimal(name),
            format_minimal(monthly)
        ),
        _ => format_minimal(row),
    }
}

fn pick_key_field(value: &Value) -> String {
    if let Value::Object(map) = value {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }
    format_minimal(value)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_minimal)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_summary() {
        let row = json!({"id": 5, "borrower": "Cruz", "monthly_payment": "₱875.00"});
        assert_eq!(summarise_row(&row), "5\tCruz\t₱875.00");
    }

    #[test]
    fn test_quote_envelope_picks_monthly_payment() {
        let out = json!({"result": {"principal": "100", "monthly_payment": "8.75"}});
        let result = out.get("result").unwrap();
        assert_eq!(pick_key_field(result), "8.75");
    }

    #[test]
    fn test_recycled_ids_joined() {
        let out = json!({"recycled_ids": [2, 4]});
        assert_eq!(pick_key_field(&out), "2 4");
    }
}
