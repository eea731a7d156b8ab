use serde_json::Value;
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Digit tests come out as one row per digit, a session as the same rows
/// prefixed with the test kind, everything else as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => write_result(&mut wtr, result),
            None => write_fields(&mut wtr, value),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result(wtr: &mut StdoutWriter<'_>, result: &Value) {
    if let Some(Value::Array(results)) = result.get("results") {
        write_session_rows(wtr, "primary", results, true);
        if let Some(Value::Array(second)) = result
            .get("second_order")
            .and_then(|so| so.get("results"))
        {
            write_session_rows(wtr, "second_order", second, false);
        }
        return;
    }

    for key in ["table", "rows", "entries", "values"] {
        if let Some(Value::Array(arr)) = result.get(key) {
            write_array_csv(wtr, arr);
            return;
        }
    }
    write_fields(wtr, result);
}

/// One row per digit across every test, `stage` distinguishing primary
/// from second-order rows.
fn write_session_rows(wtr: &mut StdoutWriter<'_>, stage: &str, results: &[Value], header: bool) {
    let columns = ["digit", "counts", "found", "expected", "abs_dif", "z_score"];
    if header {
        let mut record = vec!["stage", "kind"];
        record.extend(columns);
        let _ = wtr.write_record(&record);
    }
    for r in results {
        let kind = r.get("kind").map(format_csv_value).unwrap_or_default();
        let Some(Value::Array(rows)) = r.get("table") else {
            continue;
        };
        for row in rows {
            let mut record = vec![stage.to_string(), kind.clone()];
            record.extend(
                columns
                    .iter()
                    .map(|c| row.get(*c).map(format_csv_value).unwrap_or_default()),
            );
            let _ = wtr.write_record(&record);
        }
    }
}

fn write_fields(wtr: &mut StdoutWriter<'_>, value: &Value) {
    let _ = wtr.write_record(["field", "value"]);
    if let Value::Object(map) = value {
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        let _ = wtr.write_record(["value"]);
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
