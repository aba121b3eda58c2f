//! Pipeline and display configuration

use crate::error::{Result, SurveyError};
use crate::table::ScaleDomain;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for cleaning, normalization and statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name prefix that marks a survey item column
    pub item_prefix: String,

    /// Allowed response values
    pub scale: ScaleDomain,

    /// Delta degrees of freedom for the reported standard deviation
    pub std_ddof: u8,

    /// Number of entries in each ranking view
    pub top_n: usize,

    /// Options for rendering reports
    pub display: DisplayConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            item_prefix: "p_".to_string(),
            scale: ScaleDomain::default(),
            std_ddof: 1,
            top_n: 10,
            display: DisplayConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set the item prefix
    pub fn with_item_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.item_prefix = prefix.into();
        self
    }

    /// Builder method to set the response scale
    pub fn with_scale(mut self, scale: ScaleDomain) -> Self {
        self.scale = scale;
        self
    }

    /// Builder method to set the standard deviation ddof
    pub fn with_std_ddof(mut self, ddof: u8) -> Self {
        self.std_ddof = ddof;
        self
    }

    /// Builder method to set the ranking size
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Builder method to set display options
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Reject settings under which no run can be meaningful
    pub fn validate(&self) -> Result<()> {
        if self.item_prefix.is_empty() {
            return Err(SurveyError::ConfigError(
                "item_prefix must not be empty".to_string(),
            ));
        }
        if self.scale.is_empty() {
            return Err(SurveyError::InvalidParameter {
                name: "scale".to_string(),
                value: format!("{}..={}", self.scale.min, self.scale.max),
                reason: "min must not exceed max".to_string(),
            });
        }
        if self.top_n == 0 {
            return Err(SurveyError::InvalidParameter {
                name: "top_n".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Options for rendering report text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Digits after the decimal point
    pub float_precision: usize,

    /// Group integer digits with commas
    pub thousands_separator: bool,

    /// Rows shown in tables before truncation
    pub max_rows: usize,

    /// Value columns shown in tables before truncation
    pub max_columns: usize,

    /// Width of title rules
    pub width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            float_precision: 4,
            thousands_separator: true,
            max_rows: 25,
            max_columns: 200,
            width: 100,
        }
    }
}

impl DisplayConfig {
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}
