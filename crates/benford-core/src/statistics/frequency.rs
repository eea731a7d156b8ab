use crate::digits::expected::{expected, ExpectedDistribution};
use crate::types::TestKind;

/// Occurrence counts of each feature value over a test's full domain.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    kind: TestKind,
    counts: Vec<u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn empty(kind: TestKind) -> Self {
        FrequencyTable {
            kind,
            counts: vec![0; kind.bucket_count()],
            total: 0,
        }
    }

    /// Count valid feature values; values outside the domain are ignored.
    pub fn from_features(kind: TestKind, features: &[u16]) -> Self {
        let mut table = FrequencyTable::empty(kind);
        for &digit in features {
            table.add(digit);
        }
        table
    }

    fn expected(&self) -> &'static ExpectedDistribution {
        expected(self.kind)
    }

    pub fn add(&mut self, digit: u16) {
        if let Some(i) = self.expected().position(digit) {
            self.counts[i] += 1;
            self.total += 1;
        }
    }

    pub fn remove(&mut self, digit: u16) {
        if let Some(i) = self.expected().position(digit) {
            if self.counts[i] > 0 {
                self.counts[i] -= 1;
                self.total -= 1;
            }
        }
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Relative frequencies; all zero when nothing was counted.
    pub fn found(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let total = self.total as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_over_domain() {
        let t = FrequencyTable::from_features(TestKind::FirstDigit, &[1, 1, 2, 9]);
        assert_eq!(t.counts(), &[2, 1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(t.total(), 4);
        assert_eq!(t.found()[0], 0.5);
    }

    #[test]
    fn test_out_of_domain_ignored() {
        let t = FrequencyTable::from_features(TestKind::FirstTwoDigits, &[5, 10, 99, 100]);
        assert_eq!(t.total(), 2);
    }

    #[test]
    fn test_add_remove() {
        let mut t = FrequencyTable::empty(TestKind::SecondDigit);
        t.add(0);
        t.add(3);
        t.remove(0);
        t.remove(7);
        assert_eq!(t.total(), 1);
        assert_eq!(t.counts()[3], 1);
    }

    #[test]
    fn test_found_empty() {
        let t = FrequencyTable::empty(TestKind::LastTwoDigits);
        assert!(t.found().iter().all(|&f| f == 0.0));
    }
}
