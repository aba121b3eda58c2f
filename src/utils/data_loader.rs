//! Reading and writing survey tables
//!
//! CSV, JSON and Parquet go through polars, Excel workbooks through calamine
//! (read) and rust_xlsxwriter (write). CSV and Excel cells are read as text
//! so that the cleaner's coercion decides what counts as a number.

use crate::error::{Result, SurveyError};
use crate::preprocessing::normalize_headers;
use calamine::{open_workbook, Data, Reader, Xlsx};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
    Parquet,
    Xlsx,
}

impl FileFormat {
    /// Format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            "parquet" => Ok(FileFormat::Parquet),
            "xlsx" => Ok(FileFormat::Xlsx),
            _ => Err(SurveyError::InvalidParameter {
                name: "path".to_string(),
                value: path.display().to_string(),
                reason: "expected a .csv, .json, .parquet or .xlsx file".to_string(),
            }),
        }
    }
}

/// Loads survey tables
pub struct DataLoader;

impl DataLoader {
    /// Load a table, picking the codec from the extension
    pub fn load(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let df = match FileFormat::from_path(path)? {
            FileFormat::Csv => Self::read_csv(path)?,
            FileFormat::Json => JsonReader::new(File::open(path)?).finish()?,
            FileFormat::Parquet => ParquetReader::new(File::open(path)?).finish()?,
            FileFormat::Xlsx => Self::read_xlsx(path)?,
        };
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded table"
        );
        Ok(df)
    }

    fn read_csv(path: &Path) -> Result<DataFrame> {
        // polars renames repeated headers, so check the raw header row first
        let headers = Self::read_csv_headers(path)?;
        normalize_headers(&headers)?;

        // schema length 0 reads every column as text
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Ok(df)
    }

    fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
        let first_row = CsvReadOptions::default()
            .with_has_header(false)
            .with_n_rows(Some(1))
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        first_row
            .get_columns()
            .iter()
            .map(|column| -> Result<String> {
                let header = column.as_materialized_series().str()?.get(0).unwrap_or("");
                Ok(header.to_string())
            })
            .collect()
    }

    fn read_xlsx(path: &Path) -> Result<DataFrame> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SurveyError::DataError("workbook has no worksheets".to_string()))??;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(|cell| xlsx_text(cell).unwrap_or_default()).collect(),
            None => return Ok(DataFrame::empty()),
        };
        normalize_headers(&headers)?;

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for row in rows {
            for (column, cell) in cells.iter_mut().zip(row) {
                column.push(xlsx_text(cell));
            }
        }

        let columns: Vec<Column> = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| Series::new(name.as_str().into(), values).into())
            .collect();
        debug!(path = %path.display(), columns = columns.len(), "Worksheet read as text");
        Ok(DataFrame::new(columns)?)
    }
}

fn xlsx_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

/// Writes survey tables
pub struct DataSaver;

impl DataSaver {
    /// Save a table, picking the codec from the extension
    pub fn save(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut df = df.clone();
        match FileFormat::from_path(path)? {
            FileFormat::Csv => {
                let mut file = File::create(path)?;
                CsvWriter::new(&mut file).finish(&mut df)?;
            }
            FileFormat::Parquet => {
                let file = File::create(path)?;
                ParquetWriter::new(file).finish(&mut df)?;
            }
            FileFormat::Json => {
                let mut file = File::create(path)?;
                JsonWriter::new(&mut file)
                    .with_json_format(JsonFormat::Json)
                    .finish(&mut df)?;
            }
            FileFormat::Xlsx => Self::write_xlsx(&df, path)?,
        }
        info!(path = %path.display(), rows = df.height(), "Saved table");
        Ok(())
    }

    /// Numeric columns become number cells, everything else text cells
    fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (idx, column) in df.get_columns().iter().enumerate() {
            let col = u16::try_from(idx).map_err(|_| SurveyError::ShapeError {
                expected: format!("at most {} columns", u16::MAX),
                actual: format!("{} columns", df.width()),
            })?;
            sheet.write_string(0, col, column.name().as_str())?;

            let series = column.as_materialized_series();
            if series.dtype().is_float() || series.dtype().is_integer() {
                let numbers = series.cast(&DataType::Float64)?;
                for (row, value) in numbers.f64()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        sheet.write_number(row as u32 + 1, col, v)?;
                    }
                }
            } else {
                let text = series.cast(&DataType::String)?;
                for (row, value) in text.str()?.into_iter().enumerate() {
                    if let Some(s) = value {
                        sheet.write_string(row as u32 + 1, col, s)?;
                    }
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{column_names, numeric_values};
    use std::io::Write;

    fn scored() -> DataFrame {
        df!(
            "id" => ["a", "b", "c"],
            "p_a" => [Some(1.0), None, Some(-1.0)]
        )
        .unwrap()
    }

    fn text_cell(df: &DataFrame, name: &str, row: usize) -> Option<String> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.CSV")).unwrap(), FileFormat::Csv);
        assert_eq!(
            FileFormat::from_path(Path::new("a.parquet")).unwrap(),
            FileFormat::Parquet
        );
        assert_eq!(FileFormat::from_path(Path::new("a.xlsx")).unwrap(), FileFormat::Xlsx);
        assert!(FileFormat::from_path(Path::new("a.xls")).is_err());
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_csv_as_text() {
        let tmp = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(tmp.as_file(), "id,p_joy,p_calm").unwrap();
        writeln!(tmp.as_file(), "a,1,2").unwrap();
        writeln!(tmp.as_file(), "b,,x").unwrap();
        tmp.as_file().flush().unwrap();

        let df = DataLoader::load(tmp.path()).unwrap();
        assert_eq!(column_names(&df), vec!["id", "p_joy", "p_calm"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("p_joy").unwrap().dtype(), &DataType::String);
        assert_eq!(text_cell(&df, "p_joy", 0), Some("1".to_string()));
        assert_eq!(text_cell(&df, "p_joy", 1), None);
        assert_eq!(text_cell(&df, "p_calm", 1), Some("x".to_string()));
    }

    #[test]
    fn test_csv_repeated_header_is_an_error() {
        let tmp = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(tmp.as_file(), "id,p_joy,p_joy").unwrap();
        writeln!(tmp.as_file(), "a,1,2").unwrap();
        tmp.as_file().flush().unwrap();

        let err = DataLoader::load(tmp.path()).unwrap_err();
        match err {
            SurveyError::DuplicateColumn { name, first, second } => {
                assert_eq!(name, "p_joy");
                assert_eq!(first, "p_joy");
                assert_eq!(second, "p_joy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_save_csv() {
        let tmp = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        DataSaver::save(&scored(), tmp.path()).unwrap();

        let reloaded = DataLoader::load(tmp.path()).unwrap();
        assert_eq!(column_names(&reloaded), vec!["id", "p_a"]);
        assert_eq!(reloaded.height(), 3);
        assert_eq!(text_cell(&reloaded, "p_a", 1), None);
        assert_eq!(numeric_values(&reloaded, "p_a").unwrap(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_json_round_trip() {
        let tmp = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        DataSaver::save(&scored(), tmp.path()).unwrap();

        let reloaded = DataLoader::load(tmp.path()).unwrap();
        assert_eq!(reloaded.height(), 3);
        assert_eq!(reloaded.width(), 2);
        assert_eq!(reloaded.column("p_a").unwrap().null_count(), 1);
        assert_eq!(numeric_values(&reloaded, "p_a").unwrap(), vec![1.0, -1.0]);
        assert_eq!(text_cell(&reloaded, "id", 2), Some("c".to_string()));
    }

    #[test]
    fn test_parquet_round_trip() {
        let tmp = tempfile::NamedTempFile::with_suffix(".parquet").unwrap();
        let original = scored();
        DataSaver::save(&original, tmp.path()).unwrap();

        let reloaded = DataLoader::load(tmp.path()).unwrap();
        assert!(reloaded.equals_missing(&original));
        assert_eq!(reloaded.column("p_a").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_xlsx_round_trip() {
        let tmp = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        DataSaver::save(&scored(), tmp.path()).unwrap();

        let reloaded = DataLoader::load(tmp.path()).unwrap();
        assert_eq!(column_names(&reloaded), vec!["id", "p_a"]);
        assert_eq!(reloaded.height(), 3);
        assert_eq!(text_cell(&reloaded, "id", 0), Some("a".to_string()));
        assert_eq!(text_cell(&reloaded, "p_a", 1), None);
        assert_eq!(numeric_values(&reloaded, "p_a").unwrap(), vec![1.0, -1.0]);
    }
}
