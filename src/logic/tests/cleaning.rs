use crate::logic::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_remove_duplicates_keeps_first_occurrence() -> Result<()> {
    let df = df!(
        "id" => &[1, 2, 1, 3, 2],
        "name" => &["a", "b", "a", "c", "b"]
    )?;

    let deduped = remove_duplicate_rows(&df)?;

    assert_eq!(deduped.height(), 3);
    let ids: Vec<Option<i32>> = deduped.column("id")?.as_materialized_series().i32()?.into_iter().collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    Ok(())
}

#[test]
fn test_remove_duplicates_compares_all_columns() -> Result<()> {
    let df = df!(
        "id" => &[1, 1],
        "name" => &["a", "b"]
    )?;

    let deduped = remove_duplicate_rows(&df)?;
    assert_eq!(deduped.height(), 2, "Rows differ in 'name' and must both stay");
    Ok(())
}

#[test]
fn test_remove_duplicates_treats_missing_as_equal() -> Result<()> {
    let df = df!(
        "x" => &[Some(1.0), None, None],
        "y" => &[Some("a"), None, None]
    )?;

    let deduped = remove_duplicate_rows(&df)?;
    assert_eq!(deduped.height(), 2);
    Ok(())
}

#[test]
fn test_remove_duplicates_is_idempotent() -> Result<()> {
    let df = df!(
        "a" => &[3, 1, 3, 2, 1, 3],
        "b" => &["z", "x", "z", "y", "x", "q"]
    )?;

    let once = remove_duplicate_rows(&df)?;
    let twice = remove_duplicate_rows(&once)?;
    assert!(once.equals_missing(&twice));
    assert_eq!(once.height(), 4);
    Ok(())
}

#[test]
fn test_remove_duplicates_on_empty_table() -> Result<()> {
    let df = DataFrame::empty();
    let deduped = remove_duplicate_rows(&df)?;
    assert_eq!(deduped.width(), 0);
    Ok(())
}

#[test]
fn test_fill_missing_uses_mean_of_present_values() -> Result<()> {
    let df = df!("x" => &[Some(1i64), None, Some(3)])?;

    let (filled, count) = fill_missing_numeric_counted(&df)?;

    assert_eq!(count, 1);
    let x = filled.column("x")?.as_materialized_series().f64()?;
    assert_eq!(x.get(0), Some(1.0));
    assert_eq!(x.get(1), Some(2.0));
    assert_eq!(x.get(2), Some(3.0));
    Ok(())
}

#[test]
fn test_fill_missing_treats_nan_as_missing() -> Result<()> {
    let df = df!("v" => &[Some(10.0), Some(f64::NAN), None, Some(30.0)])?;

    let (filled, count) = fill_missing_numeric_counted(&df)?;

    assert_eq!(count, 2);
    let v: Vec<Option<f64>> = filled.column("v")?.as_materialized_series().f64()?.into_iter().collect();
    assert_eq!(v, vec![Some(10.0), Some(20.0), Some(20.0), Some(30.0)]);
    Ok(())
}

#[test]
fn test_fill_missing_leaves_other_columns_alone() -> Result<()> {
    let df = df!(
        "num" => &[Some(2.0), None],
        "text" => &[None, Some("b")],
        "complete" => &[1i64, 2]
    )?;

    let filled = fill_missing_numeric(&df)?;

    assert_eq!(filled.column("text")?.null_count(), 1);
    assert_eq!(filled.column("complete")?.dtype(), &DataType::Int64);
    assert_eq!(filled.column("num")?.null_count(), 0);
    assert_eq!(
        filled.get_column_names(),
        df.get_column_names(),
        "Column order must be preserved"
    );
    Ok(())
}

#[test]
fn test_fill_missing_skips_all_missing_columns() -> Result<()> {
    let s = Series::new("empty".into(), vec![None::<f64>, None, None]);
    let df = DataFrame::new(vec![Column::from(s)])?;

    let (filled, count) = fill_missing_numeric_counted(&df)?;

    assert_eq!(count, 0);
    assert_eq!(filled.column("empty")?.null_count(), 3);
    let has_nan = filled
        .column("empty")?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .any(|v| v.is_some_and(f64::is_nan));
    assert!(!has_nan, "Undefined means must not leak NaN");
    Ok(())
}

#[test]
fn test_fill_missing_is_idempotent() -> Result<()> {
    let df = df!(
        "a" => &[Some(1.0), None, Some(5.0)],
        "b" => &[None, Some(4i64), Some(8)]
    )?;

    let once = fill_missing_numeric(&df)?;
    let (twice, count) = fill_missing_numeric_counted(&once)?;

    assert_eq!(count, 0);
    assert!(once.equals_missing(&twice));
    Ok(())
}

#[test]
fn test_fill_missing_keeps_present_cells() -> Result<()> {
    let df = df!("score" => &[Some(7.5), None, Some(2.5), Some(6.0)])?;

    let filled = fill_missing_numeric(&df)?;

    let before = df.column("score")?.as_materialized_series().f64()?;
    let after = filled.column("score")?.as_materialized_series().f64()?;
    for (b, a) in before.into_iter().zip(after.into_iter()) {
        if let Some(b) = b {
            assert_eq!(a, Some(b));
        } else {
            assert!(a.is_some());
        }
    }
    Ok(())
}

#[test]
fn test_apply_cleaning_reports_changes() -> Result<()> {
    let df = df!(
        "x" => &[Some(1.0), Some(1.0), None, Some(4.0)],
        "y" => &["a", "a", "b", "c"]
    )?;

    let opts = CleaningOptions {
        remove_duplicates: true,
        fill_missing_numeric: true,
    };
    let (cleaned, report) = apply_cleaning(&df, &opts)?;

    assert_eq!(report.rows_removed, 1);
    assert_eq!(report.cells_filled, 1);
    assert_eq!(cleaned.height(), 3);
    // Mean of the deduplicated column: (1 + 4) / 2.
    assert_eq!(cleaned.column("x")?.as_materialized_series().f64()?.get(1), Some(2.5));
    Ok(())
}

#[test]
fn test_apply_cleaning_with_nothing_enabled() -> Result<()> {
    let df = df!("x" => &[Some(1.0), None])?;
    let (cleaned, report) = apply_cleaning(&df, &CleaningOptions::default())?;
    assert_eq!(report, CleaningReport::default());
    assert!(cleaned.equals_missing(&df));
    Ok(())
}
