use crate::logic::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_chart_uses_first_two_numeric_columns() -> Result<()> {
    let df = df!(
        "label" => &["a", "b", "c"],
        "first" => &[1i64, 2, 3],
        "note" => &["x", "y", "z"],
        "second" => &[Some(0.5), None, Some(1.5)],
        "third" => &[9.0, 9.0, 9.0]
    )?;

    let Visualization::Chart(chart) = chart_series(&df)? else {
        panic!("expected a chart");
    };

    assert_eq!(chart.row_count, 3);
    let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(chart.series[1].values, vec![Some(0.5), None, Some(1.5)]);
    Ok(())
}

#[test]
fn test_chart_with_single_numeric_column() -> Result<()> {
    let df = df!("name" => &["a", "b"], "n" => &[4i64, 5])?;
    let Visualization::Chart(chart) = chart_series(&df)? else {
        panic!("expected a chart");
    };
    assert_eq!(chart.series.len(), 1);
    let points: Vec<(usize, f64)> = chart.series[0].points().collect();
    assert_eq!(points, vec![(0, 4.0), (1, 5.0)]);
    Ok(())
}

#[test]
fn test_text_only_table_has_no_numeric_data() -> Result<()> {
    let df = df!("a" => &["x", "y"], "b" => &["z", "w"])?;
    assert_eq!(chart_series(&df)?, Visualization::NoNumericData);
    Ok(())
}

#[test]
fn test_zero_row_table_has_no_numeric_data() -> Result<()> {
    let df = DataFrame::new(vec![Column::from(Series::new_empty(
        "n".into(),
        &DataType::Float64,
    ))])?;
    assert_eq!(chart_series(&df)?, Visualization::NoNumericData);
    Ok(())
}

#[test]
fn test_chart_does_not_mutate_table() -> Result<()> {
    let df = df!("n" => &[Some(1i64), None])?;
    let before = df.clone();
    let _chart = chart_series(&df)?;
    assert!(df.equals_missing(&before));
    assert_eq!(df.column("n")?.dtype(), &DataType::Int64);
    Ok(())
}
