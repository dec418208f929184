use crate::error::{Result, SweeperError};
use polars::prelude::*;
use std::collections::HashSet;

/// Restricts the table to `names`, in that order.
pub fn select_columns(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if df.get_column_index(name).is_none() {
            return Err(SweeperError::ColumnNotFound(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(SweeperError::DuplicateColumn(name.clone()));
        }
    }

    df.select(names.iter().map(String::as_str))
        .map_err(|e| SweeperError::ColumnNotFound(e.to_string()))
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
