use serde::{Deserialize, Serialize};

use crate::sample::{Number, Sample};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub value: Number,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatesReport {
    /// Distinct values that occur more than once.
    pub duplicated_values: usize,
    /// Highest repetition counts first, ties by ascending value.
    pub entries: Vec<DuplicateEntry>,
}

pub(crate) fn count_duplicates(values: &[Number], top_rep: Option<usize>) -> DuplicatesReport {
    let mut sorted: Vec<Number> = values
        .iter()
        .copied()
        .filter(|v| !v.as_f64().is_nan())
        .collect();
    sorted.sort_by(Number::total_cmp);

    let mut entries: Vec<DuplicateEntry> = Vec::new();
    for run in sorted.chunk_by(|a, b| a.total_cmp(b).is_eq()) {
        if run.len() > 1 {
            entries.push(DuplicateEntry {
                value: run[0],
                count: run.len(),
            });
        }
    }
    // stable sort keeps ascending value order within equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let duplicated_values = entries.len();
    if let Some(n) = top_rep {
        entries.truncate(n);
    }
    DuplicatesReport {
        duplicated_values,
        entries,
    }
}

/// Repeated raw values ranked by repetition count; `top_rep = None` keeps all.
pub fn duplicates(sample: &Sample, top_rep: Option<usize>) -> DuplicatesReport {
    let values: Vec<Number> = sample.iter().collect();
    count_duplicates(&values, top_rep)
}
