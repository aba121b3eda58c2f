//! Plain-text report rendering
//!
//! Rendering is pure: every method returns a `String` and all display options
//! come from the [`DisplayConfig`] the renderer was built with.

use crate::preprocessing::{CleaningReport, DisplayConfig, ZScoreCheck};
use crate::statistics::{RankedEntry, Ranking, StatisticsReport};
use std::fmt::Write;

/// Renders rankings, distribution tables and pipeline summaries
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    display: DisplayConfig,
}

impl ReportRenderer {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Fixed-point value, never in scientific notation; `NaN` when undefined
    pub fn format_value(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => format_float(v, self.display.float_precision, self.display.thousands_separator),
            None => "NaN".to_string(),
        }
    }

    /// Title block followed by the highest and the lowest entries
    pub fn render_ranking(&self, title_high: &str, title_low: &str, ranking: &Ranking) -> String {
        let mut out = String::new();
        self.title(&mut out, title_high, '=');
        self.entries(&mut out, &ranking.highest);
        out.push('\n');
        self.title(&mut out, title_low, '-');
        self.entries(&mut out, &ranking.lowest);
        out
    }

    /// Counts per scale point, one row per column
    pub fn render_distribution(&self, title: &str, report: &StatisticsReport) -> String {
        let mut out = String::new();
        self.title(&mut out, title, '=');

        let points: Vec<i32> = report.scale().points().collect();
        let shown_points = &points[..points.len().min(self.display.max_columns)];
        let hidden_points = points.len() - shown_points.len();

        let name_width = report
            .columns()
            .iter()
            .map(|c| c.column.chars().count())
            .max()
            .unwrap_or(0);
        let cell_width = report
            .columns()
            .iter()
            .flat_map(|c| c.distribution.counts().iter().map(|(_, n)| n.to_string().len()))
            .chain(shown_points.iter().map(|p| p.to_string().len()))
            .max()
            .unwrap_or(1);

        let _ = write!(out, "{:<name_width$}", "");
        for p in shown_points {
            let _ = write!(out, "  {:>cell_width$}", p);
        }
        if hidden_points > 0 {
            out.push_str("  ...");
        }
        out.push('\n');

        let shown_rows = report.len().min(self.display.max_rows);
        for stats in &report.columns()[..shown_rows] {
            let _ = write!(out, "{:<name_width$}", stats.column);
            for p in shown_points {
                let _ = write!(out, "  {:>cell_width$}", stats.distribution.get(*p));
            }
            if hidden_points > 0 {
                out.push_str("  ...");
            }
            out.push('\n');
        }
        if report.len() > shown_rows {
            let _ = writeln!(out, "... ({} more rows not shown)", report.len() - shown_rows);
        }
        out
    }

    /// Rows removed by each cleaning step
    pub fn render_cleaning(&self, report: &CleaningReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<24} {:>8}", "rows in", report.input_rows);
        for (stage, removed, _) in report.stages() {
            let _ = writeln!(out, "{:<24} {:>8}", stage.label(), removed);
        }
        let _ = writeln!(out, "{:<24} {:>8}", "rows out", report.output_rows);
        if report.coerced_cells > 0 {
            let _ = writeln!(out, "{:<24} {:>8}", "non-numeric cells", report.coerced_cells);
        }
        out
    }

    /// Post-scaling means and standard deviations, three decimals
    pub fn render_zscore_check(&self, checks: &[ZScoreCheck]) -> String {
        let mut out = String::new();
        let name_width = checks
            .iter()
            .map(|c| c.column.chars().count())
            .max()
            .unwrap_or(0)
            .max(6);
        let _ = writeln!(out, "{:<name_width$}  {:>8}  {:>8}", "column", "mean", "std");
        for check in checks {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:>8}  {:>8}",
                check.column,
                format_float(round_to(check.mean, 3), 3, false),
                format_float(round_to(check.std, 3), 3, false),
            );
        }
        out
    }

    fn title(&self, out: &mut String, title: &str, rule: char) {
        let line: String = std::iter::repeat(rule).take(self.display.width).collect();
        let _ = writeln!(out, "{}", line);
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", line);
    }

    fn entries(&self, out: &mut String, entries: &[RankedEntry]) {
        let values: Vec<String> = entries.iter().map(|e| self.format_value(e.value)).collect();
        let name_width = entries
            .iter()
            .map(|e| e.column.chars().count())
            .max()
            .unwrap_or(0);
        let value_width = values.iter().map(String::len).max().unwrap_or(0).max(5);

        let _ = writeln!(out, "{:<name_width$}  {:>value_width$}", "", "value");
        for (entry, value) in entries.iter().zip(values) {
            let _ = writeln!(out, "{:<name_width$}  {:>value_width$}", entry.column, value);
        }
    }
}

/// Format with a fixed number of decimals, optionally grouping thousands
pub fn format_float(value: f64, precision: usize, thousands: bool) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let fixed = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if thousands && i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{Ranking, StatisticsReport};
    use crate::table::ScaleDomain;
    use polars::prelude::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1234567.891, 4, true), "1,234,567.8910");
        assert_eq!(format_float(1234567.891, 2, false), "1234567.89");
        assert_eq!(format_float(-0.5, 4, true), "-0.5000");
        assert_eq!(format_float(-0.00001, 4, true), "0.0000");
        assert_eq!(format_float(1e-12, 4, true), "0.0000");
        assert_eq!(format_float(999.0, 0, true), "999");
        assert_eq!(format_float(f64::NAN, 4, true), "NaN");
    }

    #[test]
    fn test_render_ranking() {
        let values = vec![
            ("p_a".to_string(), Some(2.0)),
            ("p_bb".to_string(), Some(-1.5)),
            ("p_c".to_string(), None),
        ];
        let ranking = Ranking::new(&values, 2);
        let renderer = ReportRenderer::new(DisplayConfig::default().with_width(10));
        let text = renderer.render_ranking("High", "Low", &ranking);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "==========");
        assert_eq!(lines[1], "High");
        assert_eq!(lines[4], "p_a    2.0000");
        assert_eq!(lines[5], "p_bb  -1.5000");
        assert!(text.contains("----------\nLow\n----------"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_render_distribution_truncates_rows() {
        let table = df!(
            "p_a" => [-3.0, -3.0],
            "p_b" => [0.0, 2.0],
            "p_c" => [3.0, 3.0]
        )
        .unwrap();
        let cols = vec!["p_a".to_string(), "p_b".to_string(), "p_c".to_string()];
        let report = StatisticsReport::compute(&table, &cols, ScaleDomain::default(), 1).unwrap();

        let renderer = ReportRenderer::new(DisplayConfig::default().with_max_rows(2));
        let text = renderer.render_distribution("Distribution", &report);

        assert!(text.contains("p_a   2   0   0   0   0   0   0"));
        assert!(text.contains("p_b   0   0   0   1   0   1   0"));
        assert!(!text.contains("p_c"));
        assert!(text.contains("... (1 more rows not shown)"));
    }

    #[test]
    fn test_render_distribution_truncates_columns() {
        let table = df!("p_a" => [1.0]).unwrap();
        let report =
            StatisticsReport::compute(&table, &["p_a".to_string()], ScaleDomain::default(), 1)
                .unwrap();

        let renderer = ReportRenderer::new(DisplayConfig::default().with_max_columns(3));
        let text = renderer.render_distribution("Distribution", &report);
        assert!(text.contains("p_a   0   0   0  ..."));
    }

    #[test]
    fn test_render_cleaning() {
        let report = CleaningReport {
            input_rows: 5,
            coerced_cells: 0,
            duplicates_removed: 1,
            incomplete_removed: 1,
            out_of_scale_removed: 1,
            output_rows: 2,
        };
        let text = ReportRenderer::default().render_cleaning(&report);
        assert!(text.contains("duplicate rows"));
        assert!(text.contains("out-of-scale rows"));
        assert!(!text.contains("non-numeric"));
    }

    #[test]
    fn test_render_cleaning_with_inconsistent_counts() {
        let report = CleaningReport {
            input_rows: 1,
            duplicates_removed: 4,
            output_rows: 3,
            ..Default::default()
        };
        let text = ReportRenderer::default().render_cleaning(&report);
        assert!(text.contains("duplicate rows"));
        assert!(text.contains("rows out"));
    }

    #[test]
    fn test_render_zscore_check() {
        let checks = vec![ZScoreCheck {
            column: "p_joy".to_string(),
            mean: -1e-17,
            std: 0.99999999,
        }];
        let text = ReportRenderer::default().render_zscore_check(&checks);
        assert!(text.contains("p_joy      0.000     1.000"));
    }
}
