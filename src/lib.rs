//! survey-prep - Likert survey cleaning and descriptive statistics
//!
//! This crate prepares tables of Likert responses (one `p_`-prefixed column
//! per item, scale -3..3) for analysis:
//! - Header normalization and item column detection
//! - Cleaning: numeric coercion, duplicate, incomplete and out-of-scale rows
//! - Z-score normalization with a zero-variance fallback
//! - Descriptive statistics, rankings and response distributions
//!
//! # Modules
//!
//! - [`table`] - Response scale and column helpers over polars frames
//! - [`preprocessing`] - Normalization, detection, cleaning, z-scores
//! - [`statistics`] - Per-column statistics and rankings
//! - [`report`] - Plain-text report rendering
//! - [`utils`] - File loading and saving
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use polars::prelude::*;
//! use survey_prep::prelude::*;
//!
//! let raw = df!("p_joy" => ["1", "-2"], "p_calm" => ["2", "-2"])?;
//!
//! let prepared = SurveyPreprocessor::new().prepare(&raw)?;
//! let zscored = prepared.zscored()?;
//! let joy = numeric_values(&zscored, "p_joy")?;
//! assert!((joy[0] - 1.0).abs() < 1e-12 && (joy[1] + 1.0).abs() < 1e-12);
//! # Ok::<(), survey_prep::SurveyError>(())
//! ```

// Core error handling
pub mod error;
pub mod table;

// Pipeline
pub mod preprocessing;
pub mod statistics;
pub mod report;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{Result, SurveyError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, SurveyError};

    // Data model
    pub use crate::table::{column_names, item_values, numeric_values, ScaleDomain};

    // Preprocessing
    pub use crate::preprocessing::{
        CleaningReport, DisplayConfig, PipelineConfig, PreparedSurvey, SurveyPreprocessor,
        TabularCleaner, ZScoreScaler,
    };

    // Statistics
    pub use crate::statistics::{Ranking, Statistic, StatisticsReport};

    // Reporting
    pub use crate::report::ReportRenderer;

    // I/O
    pub use crate::utils::{DataLoader, DataSaver};
}
