use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const CSV_MIME: &str = "text/csv";
pub const EXCEL_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A file handed to the pipeline: its name and raw content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    /// Lowercased suffix including the dot, empty when the name has none.
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let extension = super::format::extension_of(&name);
        Self {
            name,
            extension,
            bytes,
        }
    }

    /// Reads a file from disk, naming it after the final path component.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self::new(name, bytes))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
    Unsupported,
}

#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Csv,
    Excel,
}

impl TargetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Excel => EXCEL_MIME,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
        }
    }

    /// The decoder that reads back what this target writes.
    pub fn source_format(&self) -> FileFormat {
        match self {
            Self::Csv => FileFormat::Csv,
            Self::Excel => FileFormat::Excel,
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(format!("unknown target format: {other}")),
        }
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing_numeric: bool,
}

impl CleaningOptions {
    pub fn is_empty(&self) -> bool {
        !self.remove_duplicates && !self.fill_missing_numeric
    }
}

/// What a cleaning call changed.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct CleaningReport {
    pub rows_removed: usize,
    pub cells_filled: usize,
}

impl CleaningReport {
    pub fn merge(self, other: Self) -> Self {
        Self {
            rows_removed: self.rows_removed + other.rows_removed,
            cells_filled: self.cells_filled + other.cells_filled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pub target_format: TargetFormat,
    pub source_name: String,
    pub source_extension: String,
}

impl ConversionRequest {
    pub fn new(target_format: TargetFormat, source_name: &str) -> Self {
        Self {
            target_format,
            source_name: source_name.to_owned(),
            source_extension: super::format::extension_of(source_name),
        }
    }

    /// Source name with its final extension swapped for the target's.
    pub fn output_filename(&self) -> String {
        let suffix_len = self.source_extension.len();
        let stem = if suffix_len > 0 && self.source_name.len() >= suffix_len {
            let split = self.source_name.len() - suffix_len;
            if self.source_name.is_char_boundary(split)
                && self
                    .source_name
                    .get(split..)
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.source_extension))
            {
                self.source_name.get(..split).unwrap_or(&self.source_name)
            } else {
                self.source_name.as_str()
            }
        } else {
            self.source_name.as_str()
        };
        format!("{stem}{}", self.target_format.extension())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// Decoder knobs, filled from the settings file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub infer_schema_length: usize,
    pub try_parse_dates: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10_000,
            try_parse_dates: true,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub enum ColumnKind {
    Numeric,
    Text,
    Temporal,
    Boolean,
    Nested,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Text => "Text",
            Self::Temporal => "Temporal",
            Self::Boolean => "Boolean",
            Self::Nested => "Nested",
        }
    }

    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            Self::Numeric
        } else if dtype.is_bool() {
            Self::Boolean
        } else if dtype.is_temporal() {
            Self::Temporal
        } else if dtype.is_nested() || matches!(dtype, DataType::Binary | DataType::BinaryOffset) {
            Self::Nested
        } else {
            Self::Text
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// One entry per row; `None` marks a missing value.
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    /// `(row index, value)` pairs for the rows that have a value.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    pub row_count: usize,
    pub series: Vec<ChartSeries>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visualization {
    Chart(ChartData),
    NoNumericData,
}

impl Visualization {
    pub fn is_chart(&self) -> bool {
        matches!(self, Self::Chart(_))
    }
}
