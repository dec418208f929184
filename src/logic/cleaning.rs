use super::types::{CleaningOptions, CleaningReport};
use crate::error::{Result, ResultExt as _};
use polars::prelude::*;

/// Drops every row that repeats an earlier row across all columns.
///
/// The first occurrence survives and row order is preserved. Missing cells
/// compare equal to each other.
pub fn remove_duplicate_rows(df: &DataFrame) -> Result<DataFrame> {
    if df.width() == 0 || df.height() < 2 {
        return Ok(df.clone());
    }

    df.clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()
        .context("Failed to remove duplicate rows")
}

/// Replaces missing numeric cells with the mean of their column.
///
/// See [`fill_missing_numeric_counted`] for the rules.
pub fn fill_missing_numeric(df: &DataFrame) -> Result<DataFrame> {
    Ok(fill_missing_numeric_counted(df)?.0)
}

/// Mean imputation for every numeric column, returning the number of cells
/// that were filled.
///
/// Nulls and float NaNs count as missing. The mean is taken over the values
/// present before the pass. Columns with nothing missing, or nothing present,
/// are returned untouched; filled integer columns become `Float64`.
pub fn fill_missing_numeric_counted(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let mut filled = 0;
    let mut expressions = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().clone();
        let dtype = column.dtype();
        if !dtype.is_primitive_numeric() {
            expressions.push(col(name));
            continue;
        }

        let missing = count_missing(column)?;
        if missing == 0 || missing == column.len() {
            expressions.push(col(name));
            continue;
        }

        filled += missing;
        let mut expr = col(name.clone()).cast(DataType::Float64);
        if dtype.is_float() {
            expr = expr.fill_nan(lit(NULL));
        }
        expressions.push(expr.clone().fill_null(expr.mean()).alias(name));
    }

    if filled == 0 {
        return Ok((df.clone(), 0));
    }

    let out = df
        .clone()
        .lazy()
        .select(expressions)
        .collect()
        .context("Failed to fill missing values")?;
    Ok((out, filled))
}

/// Missing cells in a numeric column: nulls, plus NaNs for floats.
pub fn count_missing(column: &Column) -> Result<usize> {
    if !column.dtype().is_float() {
        return Ok(column.null_count());
    }

    let floats = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .context("Failed to inspect numeric column")?;
    let ca = floats.f64().context("Failed to inspect numeric column")?;
    Ok(ca.into_iter().filter(|v| v.is_none_or(f64::is_nan)).count())
}

/// Runs the enabled cleaning steps: duplicate removal first, then filling.
pub fn apply_cleaning(df: &DataFrame, opts: &CleaningOptions) -> Result<(DataFrame, CleaningReport)> {
    let mut report = CleaningReport::default();
    let mut out = df.clone();

    if opts.remove_duplicates {
        let before = out.height();
        out = remove_duplicate_rows(&out)?;
        report.rows_removed = before - out.height();
    }

    if opts.fill_missing_numeric {
        let (filled_df, cells) = fill_missing_numeric_counted(&out)?;
        out = filled_df;
        report.cells_filled = cells;
    }

    Ok((out, report))
}
