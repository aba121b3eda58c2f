//! Header normalization and item-column detection

use crate::error::{Result, SurveyError};
use crate::table::{column_names, with_column_names};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Trim and rewrite a header in NFKC form
pub fn normalize_header(raw: &str) -> String {
    raw.trim().nfkc().collect()
}

/// Normalize a header sequence, failing if two headers collapse onto one name
pub fn normalize_headers<S: AsRef<str>>(headers: &[S]) -> Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(headers.len());
    let mut normalized = Vec::with_capacity(headers.len());

    for raw in headers {
        let raw = raw.as_ref();
        let name = normalize_header(raw);
        if let Some(first) = seen.get(&name) {
            return Err(SurveyError::DuplicateColumn {
                name,
                first: first.to_string(),
                second: raw.to_string(),
            });
        }
        if name != raw {
            debug!(original = %raw, normalized = %name, "Header normalized");
        }
        seen.insert(name.clone(), raw);
        normalized.push(name);
    }

    Ok(normalized)
}

/// Copy of `df` with normalized column names
pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame> {
    let names = normalize_headers(&column_names(df))?;
    with_column_names(df, &names)
}

/// Columns whose name starts with `prefix`, in table order
pub fn detect_item_columns<S: AsRef<str>>(headers: &[S], prefix: &str) -> Result<Vec<String>> {
    let items: Vec<String> = headers
        .iter()
        .map(AsRef::as_ref)
        .filter(|h| h.starts_with(prefix))
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(SurveyError::NoItemColumns {
            prefix: prefix.to_string(),
            available: headers.iter().map(|h| h.as_ref().to_string()).collect(),
        });
    }
    Ok(items)
}
