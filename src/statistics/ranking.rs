//! Top-N / bottom-N ranking of per-column statistics

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub column: String,
    pub value: Option<f64>,
}

/// The N highest and N lowest columns for one statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Descending
    pub highest: Vec<RankedEntry>,
    /// Ascending
    pub lowest: Vec<RankedEntry>,
}

impl Ranking {
    /// Rank `values` (given in column order) into both views of size `n`
    pub fn new(values: &[(String, Option<f64>)], n: usize) -> Self {
        Self {
            highest: top_n(values, n, SortOrder::Descending),
            lowest: top_n(values, n, SortOrder::Ascending),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// First `n` columns after a stable sort by value.
///
/// Ties keep column order; undefined values (None or NaN) go last in both
/// orders.
pub fn top_n(values: &[(String, Option<f64>)], n: usize, order: SortOrder) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = values
        .iter()
        .map(|(column, value)| RankedEntry {
            column: column.clone(),
            value: *value,
        })
        .collect();

    entries.sort_by(|a, b| compare(defined(a.value), defined(b.value), order));
    entries.truncate(n);
    entries
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn compare(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            SortOrder::Descending => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, Option<f64>)]) -> Vec<(String, Option<f64>)> {
        pairs.iter().map(|(c, v)| (c.to_string(), *v)).collect()
    }

    fn names(entries: &[RankedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.column.as_str()).collect()
    }

    #[test]
    fn test_ties_keep_column_order() {
        let vals = values(&[("p_a", Some(5.0)), ("p_b", Some(5.0)), ("p_c", Some(3.0))]);
        let top = top_n(&vals, 2, SortOrder::Descending);
        assert_eq!(names(&top), vec!["p_a", "p_b"]);

        let bottom = top_n(&vals, 3, SortOrder::Ascending);
        assert_eq!(names(&bottom), vec!["p_c", "p_a", "p_b"]);
    }

    #[test]
    fn test_fewer_columns_than_n() {
        let vals = values(&[("p_a", Some(1.0)), ("p_b", Some(2.0))]);
        let ranking = Ranking::new(&vals, 10);
        assert_eq!(names(&ranking.highest), vec!["p_b", "p_a"]);
        assert_eq!(names(&ranking.lowest), vec!["p_a", "p_b"]);
    }

    #[test]
    fn test_undefined_values_last() {
        let vals = values(&[
            ("p_nan", Some(f64::NAN)),
            ("p_none", None),
            ("p_low", Some(-1.0)),
            ("p_high", Some(2.0)),
        ]);
        let ranking = Ranking::new(&vals, 4);
        assert_eq!(names(&ranking.highest), vec!["p_high", "p_low", "p_nan", "p_none"]);
        assert_eq!(names(&ranking.lowest), vec!["p_low", "p_high", "p_nan", "p_none"]);
    }

    #[test]
    fn test_deterministic() {
        let vals = values(&[("p_x", Some(0.0)), ("p_y", Some(-0.0)), ("p_z", Some(0.0))]);
        let first = Ranking::new(&vals, 3);
        assert_eq!(names(&first.highest), vec!["p_x", "p_y", "p_z"]);
        for _ in 0..5 {
            assert_eq!(Ranking::new(&vals, 3), first);
        }
    }
}
