use benford_core::{ColumnData, Tabular};
use std::collections::BTreeMap;

/// A CSV file held column-wise as raw text.
pub struct CsvTable {
    columns: BTreeMap<String, Vec<String>>,
}

impl CsvTable {
    pub fn read(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let canonical = super::file::resolve_path(path)?;
        let mut reader = csv::Reader::from_path(&canonical)
            .map_err(|e| format!("Failed to open '{}': {}", canonical.display(), e))?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or("").trim().to_string());
            }
        }
        Ok(CsvTable {
            columns: headers.into_iter().zip(cells).collect(),
        })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }
}

/// Integers if every cell parses as i64, floats if every cell parses as f64
/// (empty cells become NaN), booleans for true/false, text otherwise.
fn infer(cells: &[String]) -> ColumnData {
    if let Ok(ints) = cells
        .iter()
        .map(|c| c.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
    {
        return ColumnData::Integers(ints);
    }
    let floats: Result<Vec<f64>, _> = cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                Ok(f64::NAN)
            } else {
                c.parse::<f64>()
            }
        })
        .collect();
    if let Ok(floats) = floats {
        return ColumnData::Floats(floats);
    }
    let bools: Option<Vec<bool>> = cells
        .iter()
        .map(|c| match c.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
        .collect();
    match bools {
        Some(b) => ColumnData::Booleans(b),
        None => ColumnData::Text(cells.to_vec()),
    }
}

impl Tabular for CsvTable {
    fn column(&self, name: &str) -> Option<ColumnData> {
        self.columns.get(name).map(|cells| infer(cells))
    }
}
