pub mod chart;
pub mod cleaning;
pub mod excel;
pub mod format;
pub mod io;
pub mod projection;
pub mod types;

pub use chart::{MAX_CHART_SERIES, chart_series};
pub use cleaning::{
    apply_cleaning, fill_missing_numeric, fill_missing_numeric_counted, remove_duplicate_rows,
};
pub use format::{detect_format, extension_of};
pub use io::{encode_table, load_table, load_upload};
pub use projection::{column_names, select_columns};
pub use types::{
    ChartData, ChartSeries, CleaningOptions, CleaningReport, ColumnKind, ConversionRequest,
    ConversionResult, FileFormat, LoadOptions, TargetFormat, UploadedFile, Visualization,
};

#[cfg(test)]
mod tests;
