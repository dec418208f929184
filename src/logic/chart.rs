use super::types::{ChartData, ChartSeries, Visualization};
use crate::error::{Result, ResultExt as _};
use polars::prelude::*;

/// Bar charts show at most this many numeric columns, taken in column order.
pub const MAX_CHART_SERIES: usize = 2;

/// Builds the chart view of a table without touching it.
///
/// Only numeric columns are charted. A table with none of them, or with no
/// rows, yields [`Visualization::NoNumericData`].
pub fn chart_series(df: &DataFrame) -> Result<Visualization> {
    let numeric: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .take(MAX_CHART_SERIES)
        .collect();

    if numeric.is_empty() || df.height() == 0 {
        return Ok(Visualization::NoNumericData);
    }

    let mut series = Vec::with_capacity(numeric.len());
    for column in numeric {
        let floats = column
            .as_materialized_series()
            .cast(&DataType::Float64)
            .with_context(|| format!("Failed to chart column '{}'", column.name()))?;
        let values = floats
            .f64()
            .with_context(|| format!("Failed to chart column '{}'", column.name()))?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        series.push(ChartSeries {
            name: column.name().to_string(),
            values,
        });
    }

    Ok(Visualization::Chart(ChartData {
        row_count: df.height(),
        series,
    }))
}
