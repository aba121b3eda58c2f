//! Row-level cleaning of survey tables
//!
//! Cleaning runs four steps in a fixed order, each on the output of the one
//! before:
//! 1. coerce item columns to `Float64` (unparsable cells become null)
//! 2. drop exact duplicate rows, keeping the first occurrence
//! 3. drop rows with a missing item value
//! 4. drop rows with an item value outside the response scale
//!
//! The order decides which step a row is counted under: a row that is both
//! a duplicate and incomplete is removed, and counted, as a duplicate.

use crate::error::Result;
use crate::table::{canonical_number, column, item_values, parse_number, ScaleDomain};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Share of removed rows above which cleaning logs a warning
pub const HIGH_REMOVAL_RATIO: f64 = 0.5;

/// Cleaning step identifiers, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleaningStage {
    Duplicates,
    Incomplete,
    OutOfScale,
}

impl CleaningStage {
    pub fn label(&self) -> &'static str {
        match self {
            CleaningStage::Duplicates => "duplicate rows",
            CleaningStage::Incomplete => "incomplete rows",
            CleaningStage::OutOfScale => "out-of-scale rows",
        }
    }
}

/// Row counts recorded while cleaning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows before cleaning
    pub input_rows: usize,
    /// Item cells that held a value but could not be read as a number
    pub coerced_cells: usize,
    pub duplicates_removed: usize,
    pub incomplete_removed: usize,
    pub out_of_scale_removed: usize,
    /// Rows after cleaning
    pub output_rows: usize,
}

impl CleaningReport {
    /// Total rows removed across all steps
    pub fn total_removed(&self) -> usize {
        self.input_rows.saturating_sub(self.output_rows)
    }

    /// Fraction of the input rows removed, 0.0 for an empty input
    pub fn removal_ratio(&self) -> f64 {
        if self.input_rows == 0 {
            0.0
        } else {
            self.total_removed() as f64 / self.input_rows as f64
        }
    }

    /// Per-step removals with the rows remaining after each step
    pub fn stages(&self) -> Vec<(CleaningStage, usize, usize)> {
        let after_dup = self.input_rows.saturating_sub(self.duplicates_removed);
        let after_incomplete = after_dup.saturating_sub(self.incomplete_removed);
        let after_scale = after_incomplete.saturating_sub(self.out_of_scale_removed);
        vec![
            (CleaningStage::Duplicates, self.duplicates_removed, after_dup),
            (CleaningStage::Incomplete, self.incomplete_removed, after_incomplete),
            (CleaningStage::OutOfScale, self.out_of_scale_removed, after_scale),
        ]
    }
}

/// Cleaned table plus the counts explaining how it was produced
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: DataFrame,
    pub report: CleaningReport,
}

/// Applies coercion, deduplication, completeness and scale checks
#[derive(Debug, Clone)]
pub struct TabularCleaner {
    scale: ScaleDomain,
}

impl Default for TabularCleaner {
    fn default() -> Self {
        Self::new(ScaleDomain::default())
    }
}

impl TabularCleaner {
    pub fn new(scale: ScaleDomain) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> &ScaleDomain {
        &self.scale
    }

    /// Run all steps in order
    pub fn clean(&self, df: &DataFrame, item_columns: &[String]) -> Result<CleaningOutcome> {
        let input_rows = df.height();

        let (coerced, coerced_cells) = Self::coerce_numeric(df, item_columns)?;
        let deduped = Self::drop_duplicates(&coerced)?;
        let complete = Self::drop_incomplete(&deduped, item_columns)?;
        let in_scale = self.drop_out_of_scale(&complete, item_columns)?;

        let report = CleaningReport {
            input_rows,
            coerced_cells,
            duplicates_removed: coerced.height() - deduped.height(),
            incomplete_removed: deduped.height() - complete.height(),
            out_of_scale_removed: complete.height() - in_scale.height(),
            output_rows: in_scale.height(),
        };

        info!(
            input_rows = report.input_rows,
            duplicates = report.duplicates_removed,
            incomplete = report.incomplete_removed,
            out_of_scale = report.out_of_scale_removed,
            output_rows = report.output_rows,
            "Cleaning finished"
        );
        if report.output_rows == 0 && input_rows > 0 {
            warn!("Cleaning removed every row");
        } else if report.removal_ratio() > HIGH_REMOVAL_RATIO {
            warn!(
                removed = report.total_removed(),
                share = report.removal_ratio(),
                "Cleaning removed most rows"
            );
        }

        Ok(CleaningOutcome {
            table: in_scale,
            report,
        })
    }

    /// Replace item columns with nullable `Float64` columns; returns the
    /// number of non-missing cells that failed to convert
    pub fn coerce_numeric(df: &DataFrame, item_columns: &[String]) -> Result<(DataFrame, usize)> {
        let mut coerced = df.clone();
        let mut failed = 0usize;

        for name in item_columns {
            let series = column(df, name)?.as_materialized_series();
            let numeric = to_numeric(series)?;
            failed += numeric.null_count().saturating_sub(series.null_count());
            coerced.with_column(numeric.with_name(name.as_str().into()).into_series())?;
        }

        if failed > 0 {
            debug!(cells = failed, "Non-numeric item cells set to missing");
        }
        Ok((coerced, failed))
    }

    /// Keep the first of each group of rows identical across all columns
    pub fn drop_duplicates(df: &DataFrame) -> Result<DataFrame> {
        Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
    }

    /// Keep rows with a value in every item column
    pub fn drop_incomplete(df: &DataFrame, item_columns: &[String]) -> Result<DataFrame> {
        let mut keep = all_rows(df);
        for name in item_columns {
            keep = &keep & &item_values(df, name)?.is_not_null();
        }
        Ok(df.filter(&keep)?)
    }

    /// Keep rows whose item values are all inside the scale
    pub fn drop_out_of_scale(&self, df: &DataFrame, item_columns: &[String]) -> Result<DataFrame> {
        let mut keep = all_rows(df);
        for name in item_columns {
            let inside: BooleanChunked = item_values(df, name)?
                .into_iter()
                .map(|v| v.is_some_and(|x| self.scale.contains(x)))
                .collect();
            keep = &keep & &inside;
        }
        Ok(df.filter(&keep)?)
    }
}

fn all_rows(df: &DataFrame) -> BooleanChunked {
    BooleanChunked::full("keep".into(), true, df.height())
}

/// Text is trimmed and parsed; other types go through a non-strict cast
fn to_numeric(series: &Series) -> Result<Float64Chunked> {
    let numeric: Float64Chunked = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_number))
            .collect(),
        _ => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.and_then(canonical_number))
            .collect(),
    };
    Ok(numeric)
}
