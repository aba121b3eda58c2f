//! Survey tables and the response scale
//!
//! Tables are polars [`DataFrame`]s. Raw item columns usually arrive as text;
//! once cleaned, every item column is a nullable `Float64` column and null is
//! the missing marker. Transformations take a `&DataFrame` and return a new
//! frame, the input is never modified.

use crate::error::{Result, SurveyError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// The discrete response scale, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDomain {
    pub min: i32,
    pub max: i32,
}

impl Default for ScaleDomain {
    fn default() -> Self {
        Self { min: -3, max: 3 }
    }
}

impl ScaleDomain {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Exact membership: `v` must be an integer value in `min..=max`
    pub fn contains(&self, v: f64) -> bool {
        v.is_finite() && v.fract() == 0.0 && v >= f64::from(self.min) && v <= f64::from(self.max)
    }

    /// Scale points in ascending order
    pub fn points(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }

    /// Number of scale points (zero for an inverted range)
    pub fn len(&self) -> usize {
        if self.min > self.max {
            0
        } else {
            (i64::from(self.max) - i64::from(self.min) + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a text cell as a number.
///
/// The text is trimmed first. Anything that does not parse is missing, and
/// so is NaN. Infinite values are kept so that scale validation rejects them.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().and_then(canonical_number)
}

/// NaN becomes missing and `-0.0` becomes `0.0`
#[inline]
pub fn canonical_number(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value + 0.0)
    }
}

/// Column names in frame order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Look up a column by name
pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| SurveyError::ColumnNotFound(name.to_string()))
}

/// An item column as `Float64`, missing cells included
pub fn item_values(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let numeric = column(df, name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(numeric.f64()?.clone())
}

/// Non-missing values of an item column, in row order
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = item_values(df, name)?;
    let present: Vec<f64> = values.into_iter().flatten().collect();
    Ok(present)
}

/// Same rows under new column names
pub fn with_column_names(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    if names.len() != df.width() {
        return Err(SurveyError::ShapeError {
            expected: format!("{} column names", df.width()),
            actual: format!("{} column names", names.len()),
        });
    }

    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .zip(names)
        .map(|(column, name)| {
            column
                .as_materialized_series()
                .clone()
                .with_name(name.as_str().into())
                .into()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}
