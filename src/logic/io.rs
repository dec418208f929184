use super::excel;
use super::format::detect_format;
use super::types::{
    ColumnKind, ConversionRequest, ConversionResult, FileFormat, LoadOptions, TargetFormat,
    UploadedFile,
};
use crate::error::{Result, ResultExt as _, SweeperError};
use polars::prelude::*;
use std::io::Cursor;

/// Detects the format of an upload from its name and decodes it.
///
/// Unknown extensions fail with `UnsupportedFormat` naming the extension.
pub fn load_upload(file: &UploadedFile, opts: &LoadOptions) -> Result<DataFrame> {
    match detect_format(&file.name) {
        FileFormat::Unsupported => Err(SweeperError::UnsupportedFormat {
            extension: file.extension.clone(),
        }),
        format => load_table(&file.bytes, format, opts)
            .with_context(|| format!("Failed to read {}", file.name)),
    }
}

/// Decodes raw bytes of a known format into a table.
///
/// Without a file name there is no extension to report, so
/// `FileFormat::Unsupported` is rejected with an empty one; use
/// [`load_upload`] when the name is known.
pub fn load_table(bytes: &[u8], format: FileFormat, opts: &LoadOptions) -> Result<DataFrame> {
    if bytes.is_empty() {
        return Err(SweeperError::Parse("file is empty".to_owned()));
    }

    match format {
        FileFormat::Csv => load_csv(bytes, opts),
        FileFormat::Excel => excel::decode_workbook(bytes),
        FileFormat::Unsupported => Err(SweeperError::UnsupportedFormat {
            extension: String::new(),
        }),
    }
}

pub fn load_csv(bytes: &[u8], opts: &LoadOptions) -> Result<DataFrame> {
    let try_parse_dates = opts.try_parse_dates;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(opts.infer_schema_length))
        .map_parse_options(|parse| parse.with_try_parse_dates(try_parse_dates))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("Failed to read CSV")
}

/// Fails with `Serialization` when a column cannot be written as `target`.
pub fn ensure_representable(df: &DataFrame, target: TargetFormat) -> Result<()> {
    for column in df.get_columns() {
        if ColumnKind::from_dtype(column.dtype()) == ColumnKind::Nested {
            return Err(SweeperError::Serialization(format!(
                "column '{}' has type {} which cannot be written as {}",
                column.name(),
                column.dtype(),
                target
            )));
        }
    }
    Ok(())
}

pub fn encode_csv(df: &DataFrame) -> Result<Vec<u8>> {
    ensure_representable(df, TargetFormat::Csv)?;

    let mut out = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut out)
        .map_err(|e| SweeperError::Serialization(format!("Failed to write CSV: {e}")))?;
    Ok(buffer)
}

/// Serializes a table into a download-ready buffer.
pub fn encode_table(df: &DataFrame, request: &ConversionRequest) -> Result<ConversionResult> {
    let bytes = match request.target_format {
        TargetFormat::Csv => encode_csv(df)?,
        TargetFormat::Excel => excel::encode_workbook(df)?,
    };

    let filename = request.output_filename();
    tracing::debug!(
        "Encoded {} rows x {} columns as {} ({} bytes) -> {filename}",
        df.height(),
        df.width(),
        request.target_format,
        bytes.len()
    );

    Ok(ConversionResult {
        bytes,
        filename,
        mime_type: request.target_format.mime_type().to_owned(),
    })
}
