use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_result(result);
                print_envelope_notes(map);
            }
            None => print_flat_object(value),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    if let Some(Value::Array(results)) = result.get("results") {
        for r in results {
            print_test_result(r);
        }
        if let Some(Value::Array(second)) = result
            .get("second_order")
            .and_then(|so| so.get("results"))
        {
            println!("\n== Second order ==");
            for r in second {
                print_test_result(r);
            }
        }
        if let Some(Value::Array(summation)) = result.get("summation") {
            for s in summation {
                print_summation(s);
            }
        }
    } else if result.get("table").is_some() {
        print_test_result(result);
    } else if result.get("rows").is_some() {
        print_summation(result);
    } else if let Some(Value::Array(entries)) = result.get("entries") {
        print_array_table(entries);
    } else {
        print_flat_object(result);
    }
}

fn print_test_result(r: &Value) {
    let kind = r.get("kind").map(format_value).unwrap_or_default();
    match r.get("n") {
        Some(n) => println!("\n{} (N = {})", kind, format_value(n)),
        None => println!("\n{}", kind),
    }
    if let Some(Value::Array(rows)) = r.get("table") {
        print_array_table(rows);
    }

    let mut stats: Vec<[String; 3]> = Vec::new();
    if let Some(mad) = r.get("mad") {
        let conformity = mad.get("conformity").map(format_value).unwrap_or_default();
        stats.push(["MAD".to_string(), field(mad, "value"), conformity]);
    }
    if let Some(mse) = r.get("mse") {
        stats.push(["MSE".to_string(), format_value(mse), String::new()]);
    }
    if let Some(chi) = r.get("chi_square") {
        stats.push([
            "Chi-square".to_string(),
            field(chi, "statistic"),
            format!(
                "critical {} / p {}",
                field(chi, "critical"),
                field(chi, "p_value")
            ),
        ]);
    }
    if let Some(ks) = r.get("ks") {
        stats.push([
            "Kolmogorov-Smirnov".to_string(),
            field(ks, "statistic"),
            format!("critical {}", field(ks, "critical")),
        ]);
    }
    if !stats.is_empty() {
        let mut builder = Builder::default();
        for record in stats {
            builder.push_record(record);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_summation(s: &Value) {
    println!(
        "\nSummation {} (expected share {}, MAD {})",
        field(s, "kind"),
        field(s, "expected"),
        field(s, "mad")
    );
    if let Some(Value::Array(rows)) = s.get("top").or_else(|| s.get("rows")) {
        print_array_table(rows);
    }
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .map(format_value)
        .unwrap_or_else(|| "-".to_string())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.6}", f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
