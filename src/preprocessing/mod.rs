//! Survey preprocessing
//!
//! Turns a raw survey table into a clean one and, on request, a z-scored one:
//! - Header normalization (trim + NFKC) with collision detection
//! - Item column detection by name prefix
//! - Cleaning: numeric coercion, duplicate, incomplete and out-of-scale rows
//! - Z-score scaling with population statistics

mod config;
mod pipeline;
pub mod cleaner;
pub mod columns;
pub mod scaler;

pub use config::{DisplayConfig, PipelineConfig};
pub use pipeline::{PreparedSurvey, SurveyPreprocessor};
pub use cleaner::{CleaningOutcome, CleaningReport, CleaningStage, TabularCleaner};
pub use columns::{detect_item_columns, normalize_columns, normalize_header, normalize_headers};
pub use scaler::{check_zscores, ZScoreCheck, ZScoreParams, ZScoreScaler};
