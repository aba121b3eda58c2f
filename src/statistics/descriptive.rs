//! Per-column descriptive statistics

use crate::error::Result;
use crate::table::{item_values, ScaleDomain};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which statistic to read from a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Median,
    Mean,
    StdDev,
}

impl Statistic {
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Median => "median",
            Statistic::Mean => "mean",
            Statistic::StdDev => "standard deviation",
        }
    }
}

/// Exact-match counts for each scale point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    counts: Vec<(i32, usize)>,
}

impl Distribution {
    /// Count values equal to each point of `scale`; other values and
    /// missing cells are ignored
    pub fn from_values(values: &Float64Chunked, scale: &ScaleDomain) -> Self {
        let counts = scale
            .points()
            .map(|p| {
                let target = Some(f64::from(p));
                (p, values.into_iter().filter(|v| *v == target).count())
            })
            .collect();
        Self { counts }
    }

    /// `(point, count)` pairs in ascending point order
    pub fn counts(&self) -> &[(i32, usize)] {
        &self.counts
    }

    /// Count for one point, zero when the point is off the scale
    pub fn get(&self, point: i32) -> usize {
        self.counts
            .iter()
            .find(|(p, _)| *p == point)
            .map_or(0, |(_, c)| *c)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }
}

/// Statistics for a single item column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    /// Non-missing values
    pub count: usize,
    pub median: Option<f64>,
    pub mean: Option<f64>,
    /// `None` unless there are more values than the ddof
    pub std: Option<f64>,
    pub distribution: Distribution,
}

impl ColumnStats {
    /// Compute all statistics over the non-missing values of a column
    pub fn from_values(column: &str, values: &Float64Chunked, scale: &ScaleDomain, ddof: u8) -> Self {
        let count = values.len() - values.null_count();
        let std = if count > usize::from(ddof) {
            values.std(ddof)
        } else {
            None
        };

        Self {
            column: column.to_string(),
            count,
            median: values.median(),
            mean: values.mean(),
            std,
            distribution: Distribution::from_values(values, scale),
        }
    }

    pub fn get(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Median => self.median,
            Statistic::Mean => self.mean,
            Statistic::StdDev => self.std,
        }
    }
}

/// Statistics for every item column, in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    scale: ScaleDomain,
    ddof: u8,
    columns: Vec<ColumnStats>,
}

impl StatisticsReport {
    /// Compute statistics for each of `item_columns` independently
    pub fn compute(
        df: &DataFrame,
        item_columns: &[String],
        scale: ScaleDomain,
        ddof: u8,
    ) -> Result<Self> {
        let columns = item_columns
            .iter()
            .map(|name| {
                let stats = ColumnStats::from_values(name, &item_values(df, name)?, &scale, ddof);
                debug!(
                    column = %name,
                    count = stats.count,
                    median = ?stats.median,
                    mean = ?stats.mean,
                    std = ?stats.std,
                    "Column statistics"
                );
                Ok(stats)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            scale,
            ddof,
            columns,
        })
    }

    pub fn scale(&self) -> &ScaleDomain {
        &self.scale
    }

    pub fn ddof(&self) -> u8 {
        self.ddof
    }

    pub fn columns(&self) -> &[ColumnStats] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.column == column)
    }

    /// One statistic for every column, in column order
    pub fn values(&self, statistic: Statistic) -> Vec<(String, Option<f64>)> {
        self.columns
            .iter()
            .map(|c| (c.column.clone(), c.get(statistic)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(values: &[Option<f64>]) -> Float64Chunked {
        values.iter().copied().collect()
    }

    fn stats(values: &[Option<f64>], ddof: u8) -> ColumnStats {
        ColumnStats::from_values("p_x", &chunked(values), &ScaleDomain::default(), ddof)
    }

    #[test]
    fn test_distribution_counts() {
        let values = chunked(&[Some(-3.0), Some(-3.0), Some(0.0), Some(2.0)]);
        let dist = Distribution::from_values(&values, &ScaleDomain::default());
        assert_eq!(
            dist.counts(),
            &[(-3, 2), (-2, 0), (-1, 0), (0, 1), (1, 0), (2, 1), (3, 0)]
        );
        assert_eq!(dist.get(-3), 2);
        assert_eq!(dist.get(9), 0);
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn test_distribution_is_exact_match() {
        let values = chunked(&[Some(0.5), Some(1.0), Some(7.0), None]);
        let dist = Distribution::from_values(&values, &ScaleDomain::default());
        assert_eq!(dist.get(0), 0);
        assert_eq!(dist.get(1), 1);
        assert_eq!(dist.total(), 1);
    }

    #[test]
    fn test_median() {
        assert_eq!(stats(&[Some(3.0), Some(1.0), Some(2.0)], 1).median, Some(2.0));
        assert_eq!(
            stats(&[Some(4.0), Some(1.0), Some(2.0), Some(3.0)], 1).median,
            Some(2.5)
        );
        assert_eq!(stats(&[], 1).median, None);
    }

    #[test]
    fn test_mean_and_std() {
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let sample = stats(&values, 1);
        assert_eq!(sample.mean, Some(2.5));
        assert!((sample.std.unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let population = stats(&values, 0);
        assert!((population.std.unwrap() - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_undefined_for_short_columns() {
        assert_eq!(stats(&[Some(2.0)], 1).std, None);
        assert_eq!(stats(&[], 0).std, None);
        assert_eq!(stats(&[Some(2.0), None], 1).std, None);
        assert_eq!(stats(&[Some(2.0)], 0).std, Some(0.0));
    }

    #[test]
    fn test_report_skips_missing() {
        let df = df!(
            "p_a" => [Some(1.0), None, Some(3.0)],
            "p_b" => [None::<f64>, None, None]
        )
        .unwrap();
        let cols = vec!["p_a".to_string(), "p_b".to_string()];

        let report = StatisticsReport::compute(&df, &cols, ScaleDomain::default(), 1).unwrap();
        let a = report.get("p_a").unwrap();
        assert_eq!(a.count, 2);
        assert_eq!(a.median, Some(2.0));
        assert_eq!(a.mean, Some(2.0));

        let b = report.get("p_b").unwrap();
        assert_eq!(b.count, 0);
        assert_eq!(b.median, None);
        assert_eq!(b.mean, None);
        assert_eq!(b.std, None);
        assert_eq!(b.distribution.total(), 0);

        assert_eq!(
            report.values(Statistic::Mean),
            vec![("p_a".to_string(), Some(2.0)), ("p_b".to_string(), None)]
        );
    }
}
