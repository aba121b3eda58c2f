//! Z-score scaling of item columns

use crate::error::{Result, SurveyError};
use crate::table::item_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters fitted for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZScoreParams {
    /// Population mean and population standard deviation (ddof = 0)
    Standard { mean: f64, std: f64 },
    /// Zero or undefined variance: the column maps to 0.0
    Constant,
}

impl ZScoreParams {
    /// Fit to the non-missing values of a column
    pub fn fit(values: &Float64Chunked) -> Self {
        match (values.mean(), values.std(0)) {
            (Some(mean), Some(std)) if std != 0.0 && std.is_finite() && mean.is_finite() => {
                ZScoreParams::Standard { mean, std }
            }
            _ => ZScoreParams::Constant,
        }
    }

    fn apply(&self, values: &Float64Chunked) -> Float64Chunked {
        match *self {
            ZScoreParams::Constant => {
                Float64Chunked::full(values.name().clone(), 0.0, values.len())
            }
            ZScoreParams::Standard { mean, std } => values
                .into_iter()
                .map(|opt| opt.map(|v| (v - mean) / std))
                .collect(),
        }
    }
}

/// Per-column z-score scaler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZScoreScaler {
    params: Vec<(String, ZScoreParams)>,
    is_fitted: bool,
}

impl ZScoreScaler {
    /// Create a new scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the scaler to the given columns
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut params = Vec::with_capacity(columns.len());
        for name in columns {
            let fitted = ZScoreParams::fit(&item_values(df, name)?);
            match fitted {
                ZScoreParams::Constant => {
                    warn!(column = %name, "Zero or undefined variance, column set to 0.0")
                }
                ZScoreParams::Standard { mean, std } => {
                    debug!(column = %name, mean, std, "Fitted z-score parameters")
                }
            }
            params.push((name.clone(), fitted));
        }

        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data, returning a new frame
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(SurveyError::NotFitted);
        }

        let mut result = df.clone();
        for (name, params) in &self.params {
            let scaled = params
                .apply(&item_values(df, name)?)
                .with_name(name.as_str().into());
            result.with_column(scaled.into_series())?;
        }
        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Fitted parameters, in column order
    pub fn params(&self) -> &[(String, ZScoreParams)] {
        &self.params
    }
}

/// Resulting moments of a scaled column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreCheck {
    pub column: String,
    pub mean: f64,
    pub std: f64,
}

impl ZScoreCheck {
    /// Mean ~0 and std ~1, or both exactly 0 for a constant column
    pub fn is_standardized(&self, tolerance: f64) -> bool {
        let unit = self.mean.abs() < tolerance && (self.std - 1.0).abs() < tolerance;
        let constant = self.mean == 0.0 && self.std == 0.0;
        unit || constant
    }
}

/// Population mean and std of each scaled column, for display after scaling
pub fn check_zscores(df: &DataFrame, columns: &[String]) -> Result<Vec<ZScoreCheck>> {
    columns
        .iter()
        .map(|name| {
            let values = item_values(df, name)?;
            Ok(ZScoreCheck {
                column: name.clone(),
                mean: values.mean().unwrap_or(f64::NAN),
                std: values.std(0).unwrap_or(f64::NAN),
            })
        })
        .collect()
}
