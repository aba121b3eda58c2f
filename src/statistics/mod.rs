//! Descriptive statistics and rankings for item columns
//!
//! Statistics are computed per column over non-missing values only:
//! - median and mean
//! - standard deviation with configurable ddof
//! - response counts for every point of the scale
//!
//! [`Ranking`] turns any one of them into top-N and bottom-N views.

pub mod descriptive;
pub mod ranking;

pub use descriptive::{ColumnStats, Distribution, Statistic, StatisticsReport};
pub use ranking::{top_n, RankedEntry, Ranking, SortOrder};

use crate::error::Result;
use crate::preprocessing::{PipelineConfig, PreparedSurvey};

/// Statistics for a prepared survey using the scale and ddof from `config`
pub fn describe(prepared: &PreparedSurvey, config: &PipelineConfig) -> Result<StatisticsReport> {
    StatisticsReport::compute(
        &prepared.table,
        &prepared.item_columns,
        config.scale,
        config.std_ddof,
    )
}

/// Highest/lowest views of one statistic, sized by `config.top_n`
pub fn rank(report: &StatisticsReport, statistic: Statistic, config: &PipelineConfig) -> Ranking {
    Ranking::new(&report.values(statistic), config.top_n)
}
