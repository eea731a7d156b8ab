//! Raw numeric input and the tabular-container seam.
//!
//! A [`Sample`] is an immutable, ordered sequence of either integers or
//! floats. It can be built directly, from loosely typed JSON values, or
//! from any container implementing [`Tabular`] plus a column name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::BenfordError;
use crate::BenfordResult;

/// A single raw entry, keeping its original representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Total order used wherever entries are sorted or grouped.
    pub fn total_cmp(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Ordered sequence of raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

impl Sample {
    pub fn len(&self) -> usize {
        match self {
            Sample::Integers(v) => v.len(),
            Sample::Floats(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<Number> {
        match self {
            Sample::Integers(v) => v.get(idx).copied().map(Number::Int),
            Sample::Floats(v) => v.get(idx).copied().map(Number::Float),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Number> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Build a sample from JSON numbers. Any float promotes the whole
    /// sequence to floats; anything that is not a number is rejected.
    pub fn from_json_values(values: &[Value]) -> BenfordResult<Sample> {
        let mut ints = Vec::with_capacity(values.len());
        let mut all_int = true;
        for (i, v) in values.iter().enumerate() {
            match v {
                Value::Number(n) => {
                    if all_int {
                        match n.as_i64() {
                            Some(x) => ints.push(x),
                            None => all_int = false,
                        }
                    }
                }
                other => {
                    return Err(BenfordError::InvalidDataType(format!(
                        "element {i} is {other}; values must be integers or floats"
                    )))
                }
            }
        }
        if all_int {
            return Ok(Sample::Integers(ints));
        }
        let floats = values
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect();
        Ok(Sample::Floats(floats))
    }

    /// Select a column from a tabular container.
    pub fn from_table<T: Tabular + ?Sized>(table: &T, column: &str) -> BenfordResult<Sample> {
        match table.column(column) {
            Some(ColumnData::Integers(v)) => Ok(Sample::Integers(v)),
            Some(ColumnData::Floats(v)) => Ok(Sample::Floats(v)),
            Some(ColumnData::Text(_)) => Err(BenfordError::InvalidDataType(format!(
                "column '{column}' holds text; convert it to integers or floats"
            ))),
            Some(ColumnData::Booleans(_)) => Err(BenfordError::InvalidDataType(format!(
                "column '{column}' holds booleans; convert it to integers or floats"
            ))),
            None => Err(BenfordError::config(
                "column",
                format!("column '{column}' not found"),
            )),
        }
    }

    /// Keep entries passing the sign filter, dropping non-finite floats.
    /// Returns the filtered sample and the number of non-finite entries.
    pub(crate) fn filtered(&self, sign: crate::types::SignFilter) -> (Sample, usize) {
        match self {
            Sample::Integers(v) => (
                Sample::Integers(
                    v.iter()
                        .copied()
                        .filter(|&x| sign.keeps(x as f64))
                        .collect(),
                ),
                0,
            ),
            Sample::Floats(v) => {
                let non_finite = v.iter().filter(|x| !x.is_finite()).count();
                (
                    Sample::Floats(
                        v.iter()
                            .copied()
                            .filter(|x| x.is_finite() && sign.keeps(*x))
                            .collect(),
                    ),
                    non_finite,
                )
            }
        }
    }
}

impl From<Vec<i64>> for Sample {
    fn from(v: Vec<i64>) -> Self {
        Sample::Integers(v)
    }
}

impl From<Vec<f64>> for Sample {
    fn from(v: Vec<f64>) -> Self {
        Sample::Floats(v)
    }
}

/// Column payload handed out by a [`Tabular`] container.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integers(Vec<i64>),
    Floats(Vec<f64>),
    Text(Vec<String>),
    Booleans(Vec<bool>),
}

/// Column-oriented container the caller owns.
pub trait Tabular {
    fn column(&self, name: &str) -> Option<ColumnData>;
}

impl Tabular for BTreeMap<String, ColumnData> {
    fn column(&self, name: &str) -> Option<ColumnData> {
        self.get(name).cloned()
    }
}

impl Tabular for HashMap<String, ColumnData> {
    fn column(&self, name: &str) -> Option<ColumnData> {
        self.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignFilter;
    use serde_json::json;

    #[test]
    fn test_json_integers() {
        let s = Sample::from_json_values(&[json!(1), json!(-20), json!(300)]).unwrap();
        assert_eq!(s, Sample::Integers(vec![1, -20, 300]));
    }

    #[test]
    fn test_json_promotes_to_floats() {
        let s = Sample::from_json_values(&[json!(1), json!(2.5)]).unwrap();
        assert_eq!(s, Sample::Floats(vec![1.0, 2.5]));
    }

    #[test]
    fn test_json_rejects_text() {
        let err = Sample::from_json_values(&[json!(1), json!("abc")]).unwrap_err();
        assert!(matches!(err, BenfordError::InvalidDataType(_)));
    }

    #[test]
    fn test_from_table() {
        let mut table = BTreeMap::new();
        table.insert("amount".to_string(), ColumnData::Floats(vec![1.5, 2.5]));
        table.insert(
            "vendor".to_string(),
            ColumnData::Text(vec!["a".into(), "b".into()]),
        );
        assert_eq!(
            Sample::from_table(&table, "amount").unwrap(),
            Sample::Floats(vec![1.5, 2.5])
        );
        assert!(matches!(
            Sample::from_table(&table, "vendor"),
            Err(BenfordError::InvalidDataType(_))
        ));
        assert!(matches!(
            Sample::from_table(&table, "missing"),
            Err(BenfordError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_filtered_drops_zero_and_nan() {
        let s = Sample::Floats(vec![0.0, 1.0, -2.0, f64::NAN, f64::INFINITY]);
        let (all, dropped) = s.filtered(SignFilter::All);
        assert_eq!(all, Sample::Floats(vec![1.0, -2.0]));
        assert_eq!(dropped, 2);
        let (neg, _) = s.filtered(SignFilter::Neg);
        assert_eq!(neg, Sample::Floats(vec![-2.0]));
    }

    #[test]
    fn test_number_order() {
        assert_eq!(Number::Int(3).total_cmp(&Number::Int(5)), Ordering::Less);
        assert_eq!(Number::Float(2.0), Number::Int(2));
    }
}
