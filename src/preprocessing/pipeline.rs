//! Survey preparation pipeline

use crate::error::Result;
use super::{
    cleaner::{CleaningReport, TabularCleaner},
    columns::{detect_item_columns, normalize_columns},
    config::PipelineConfig,
    scaler::{check_zscores, ZScoreCheck, ZScoreScaler},
};
use crate::table::column_names;
use polars::prelude::DataFrame;
use std::time::Instant;
use tracing::info;

/// Output of [`SurveyPreprocessor::prepare`]
#[derive(Debug, Clone)]
pub struct PreparedSurvey {
    /// Cleaned table with normalized headers
    pub table: DataFrame,
    /// Detected item columns, in table order
    pub item_columns: Vec<String>,
    /// Per-step removal counts
    pub report: CleaningReport,
}

/// Normalizes, detects and cleans a raw survey table
#[derive(Debug, Clone, Default)]
pub struct SurveyPreprocessor {
    config: PipelineConfig,
    prepare_time: Option<f64>,
}

impl SurveyPreprocessor {
    /// Create a new preprocessor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new preprocessor with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            prepare_time: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Seconds spent in the last `prepare` call
    pub fn prepare_time(&self) -> Option<f64> {
        self.prepare_time
    }

    /// Normalize headers, detect item columns and clean rows
    pub fn prepare(&mut self, raw: &DataFrame) -> Result<PreparedSurvey> {
        let start = Instant::now();
        self.config.validate()?;

        let table = normalize_columns(raw)?;
        let item_columns = detect_item_columns(&column_names(&table), &self.config.item_prefix)?;
        info!(
            columns = table.width(),
            items = item_columns.len(),
            "Detected item columns"
        );

        let outcome = TabularCleaner::new(self.config.scale).clean(&table, &item_columns)?;
        self.prepare_time = Some(start.elapsed().as_secs_f64());

        Ok(PreparedSurvey {
            table: outcome.table,
            item_columns,
            report: outcome.report,
        })
    }
}

impl PreparedSurvey {
    /// Z-scored copy of the cleaned table
    pub fn zscored(&self) -> Result<DataFrame> {
        ZScoreScaler::new().fit_transform(&self.table, &self.item_columns)
    }

    /// Z-scored table together with its per-column check
    pub fn zscored_with_check(&self) -> Result<(DataFrame, Vec<ZScoreCheck>)> {
        let scaled = self.zscored()?;
        let checks = check_zscores(&scaled, &self.item_columns)?;
        Ok((scaled, checks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurveyError;
    use polars::prelude::*;

    fn raw() -> DataFrame {
        df!(
            "respondent" => ["a", "b", "c"],
            " p_joy" => ["1", "3", "oops"],
            "p_calm " => ["2", "-1", "0"]
        )
        .unwrap()
    }

    #[test]
    fn test_prepare() {
        let mut pre = SurveyPreprocessor::new();
        let prepared = pre.prepare(&raw()).unwrap();

        assert_eq!(prepared.item_columns, vec!["p_joy", "p_calm"]);
        assert_eq!(column_names(&prepared.table), vec!["respondent", "p_joy", "p_calm"]);
        assert_eq!(prepared.table.height(), 2);
        assert_eq!(prepared.report.coerced_cells, 1);
        assert_eq!(prepared.report.incomplete_removed, 1);
        assert!(pre.prepare_time().is_some());
    }

    #[test]
    fn test_prepare_custom_prefix_fails() {
        let config = PipelineConfig::new().with_item_prefix("q_");
        let result = SurveyPreprocessor::with_config(config).prepare(&raw());
        match result {
            Err(SurveyError::NoItemColumns { prefix, available }) => {
                assert_eq!(prefix, "q_");
                assert_eq!(available, vec!["respondent", "p_joy", "p_calm"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zscored_with_check() {
        let prepared = SurveyPreprocessor::new().prepare(&raw()).unwrap();
        let (scaled, checks) = prepared.zscored_with_check().unwrap();

        assert_eq!(scaled.height(), prepared.table.height());
        assert_eq!(checks.len(), 2);
        assert!(checks.iter().all(|c| c.is_standardized(1e-9)));
    }
}
