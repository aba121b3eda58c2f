//! survey-prep CLI Module
//!
//! Command-line interface for cleaning, z-scoring and describing survey tables.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::SurveyError;
use crate::preprocessing::{
    detect_item_columns, normalize_columns, PipelineConfig, PreparedSurvey, SurveyPreprocessor,
};
use crate::report::ReportRenderer;
use crate::statistics::{self, Statistic};
use crate::table::column_names;
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn indented(block: &str) {
    for line in block.lines() {
        println!("  {}", line);
    }
}

fn column_list(label: &str, columns: &[String]) {
    println!("  {} {}", muted(&format!("{} ({}):", label, columns.len())), columns.join(", "));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "survey-prep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clean, z-score and describe Likert survey tables")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean the responses and save their z-scores
    Clean {
        /// Input data file (CSV, JSON, Parquet, or XLSX)
        #[arg(short, long)]
        data: PathBuf,

        /// Output file (CSV, JSON, Parquet, or XLSX)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print medians, means, standard deviations and response distributions
    Stats {
        /// Input data file (CSV, JSON, Parquet, or XLSX)
        #[arg(short, long)]
        data: PathBuf,

        /// Entries per ranking (overrides the configuration)
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

/// Default configuration, or the one in `path`
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(p) => Ok(PipelineConfig::from_json_file(p)?),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_and_prepare(data_path: &Path, config: &PipelineConfig) -> anyhow::Result<PreparedSurvey> {
    step_run("Loading data");
    let start = Instant::now();
    let raw = DataLoader::load(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", raw.height(), raw.width(), start.elapsed()));

    let mut preprocessor = SurveyPreprocessor::with_config(config.clone());
    let prepared = preprocessor.prepare(&raw)?;

    println!();
    column_list("Columns", &column_names(&prepared.table));
    column_list("Item columns", &prepared.item_columns);

    section("Cleaning");
    indented(&ReportRenderer::new(config.display.clone()).render_cleaning(&prepared.report));

    Ok(prepared)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_clean(data_path: &Path, output_path: &Path, config: &PipelineConfig) -> anyhow::Result<()> {
    section("Clean");

    let prepared = load_and_prepare(data_path, config)?;

    step_run("Computing z-scores");
    let start = Instant::now();
    let (scaled, checks) = prepared.zscored_with_check()?;
    step_done(&format!("{:?}", start.elapsed()));

    section("Check (mean ~0, std ~1)");
    indented(&ReportRenderer::new(config.display.clone()).render_zscore_check(&checks));

    step_run(&format!("Saving → {}", output_path.display()));
    DataSaver::save(&scaled, output_path)?;
    step_done(&format!("{} rows × {} cols", scaled.height(), scaled.width()));

    println!();
    Ok(())
}

pub fn cmd_stats(data_path: &Path, top: Option<usize>, config: &PipelineConfig) -> anyhow::Result<()> {
    section("Statistics");

    let mut config = config.clone();
    if let Some(n) = top {
        config = config.with_top_n(n);
        config.validate()?;
    }

    let prepared = load_and_prepare(data_path, &config)?;
    let report = statistics::describe(&prepared, &config)?;
    let renderer = ReportRenderer::new(config.display.clone());
    let n = config.top_n;

    let views = [
        (Statistic::Median, "median rating"),
        (Statistic::Mean, "mean rating"),
    ];
    for (statistic, what) in views {
        let ranking = statistics::rank(&report, statistic, &config);
        println!();
        print!(
            "{}",
            renderer.render_ranking(
                &format!("Top {} – Highest {}", n, what),
                &format!("Top {} – Lowest {}", n, what),
                &ranking,
            )
        );
    }

    println!();
    print!(
        "{}",
        renderer.render_distribution(
            &format!(
                "Distribution of responses per scale point ({}..{}) (counts)",
                config.scale.min, config.scale.max
            ),
            &report,
        )
    );

    let ranking = statistics::rank(&report, Statistic::StdDev, &config);
    println!();
    print!(
        "{}",
        renderer.render_ranking(
            &format!("Top {} – Highest standard deviation (most variable)", n),
            &format!("Top {} – Lowest standard deviation (most consistent)", n),
            &ranking,
        )
    );

    println!();
    println!("  {} {}", ok("✓"), "Finished");
    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path, config: &PipelineConfig) -> anyhow::Result<()> {
    section("Data Info");

    let raw = DataLoader::load(data_path)?;
    let normalized = normalize_columns(&raw)?;
    let names = column_names(&normalized);
    let items = item_columns_or_none(&names, &config.item_prefix)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), normalized.height());
    println!("  {:<12} {}", muted("Columns"), normalized.width());
    println!("  {:<12} {}", muted("Items"), items.len());
    println!();

    println!("  {:<24} {:>6} {:>6}", muted("Column"), muted("Item"), muted("Nulls"));
    println!("  {}", dim(&"─".repeat(38)));
    for name in &names {
        let nulls = normalized.column(name)?.null_count();
        let is_item = if items.contains(name) { "yes" } else { "" };
        println!("  {:<24} {:>6} {:>6}", name, is_item, nulls);
    }

    println!();
    Ok(())
}

/// Item columns for display; a table without any is not an error here
fn item_columns_or_none(names: &[String], prefix: &str) -> crate::Result<Vec<String>> {
    match detect_item_columns(names, prefix) {
        Ok(items) => Ok(items),
        Err(SurveyError::NoItemColumns { .. }) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "survey-prep".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("Likert cleaning & statistics  ·  v{}", env!("CARGO_PKG_VERSION"))));
    println!();
}

fn ask_path(theme: &dialoguer::theme::ColorfulTheme, prompt: &str) -> anyhow::Result<PathBuf> {
    let input: String = dialoguer::Input::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()?;
    Ok(PathBuf::from(input.trim()))
}

/// Menu-driven mode used when no subcommand is given
pub fn cmd_interactive(config: &PipelineConfig) -> anyhow::Result<()> {
    use dialoguer::{Select, theme::ColorfulTheme};

    print_banner();

    let theme = ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    };

    loop {
        let items = &[
            "Clean & z-score       save a normalized copy",
            "Statistics            rankings & distributions",
            "Data info             columns & missing values",
            "Exit",
        ];

        println!();
        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        // errors from a single run are shown and the menu continues
        let result = match sel {
            Some(0) => {
                let data = ask_path(&theme, "Input file (.csv, .json, .parquet, .xlsx)")?;
                let output = ask_path(&theme, "Save z-scores as (.csv, .json, .parquet, .xlsx)")?;
                cmd_clean(&data, &output, config)
            }
            Some(1) => {
                let data = ask_path(&theme, "Input file (.csv, .json, .parquet, .xlsx)")?;
                cmd_stats(&data, None, config)
            }
            Some(2) => {
                let data = ask_path(&theme, "Input file (.csv, .json, .parquet, .xlsx)")?;
                cmd_info(&data, config)
            }
            Some(3) | None => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            println!();
            println!("  {} {}", "error".red().bold(), e);
        }
    }

    Ok(())
}
