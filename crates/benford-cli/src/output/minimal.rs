use serde_json::Value;

/// Print just the key answer from the output.
///
/// A session prints one `kind mad conformity` line per test. Single results
/// look for well-known fields in order of priority, then fall back to the
/// first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(results)) = result_obj.get("results") {
        for r in results {
            println!("{}", test_line(r));
        }
        return;
    }
    if result_obj.get("mad").is_some_and(Value::is_object) {
        println!("{}", test_line(result_obj));
        return;
    }

    let priority_keys = ["mad", "radius", "duplicated_values", "values", "total"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }
        if let Some(Value::Object(arc)) = map.get("arc") {
            if let Some(radius) = arc.get("radius") {
                println!("{}", format_minimal(radius));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn test_line(r: &Value) -> String {
    let pick = |v: Option<&Value>| v.map(format_minimal).unwrap_or_else(|| "-".to_string());
    let mad = r.get("mad");
    format!(
        "{} {} {}",
        pick(r.get("kind")),
        pick(mad.and_then(|m| m.get("value"))),
        pick(mad.and_then(|m| m.get("conformity")))
    )
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_minimal).collect::<Vec<_>>().join(","),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
