use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use sweeper::config::{self, SweeperSettings};
use sweeper::error::SweeperError;
use sweeper::logic::{ChartData, TargetFormat, UploadedFile, Visualization};
use sweeper::session::{FileId, Session};

#[derive(Parser)]
#[command(name = "sweeper", version, about = "Clean and convert CSV and Excel files")]
pub struct Cli {
    /// Path to a JSON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output from sweeper
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the first rows of each file
    Preview {
        /// CSV (.csv) or Excel (.xlsx) files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of rows to show. Defaults to the `preview_rows` setting.
        #[arg(short, long)]
        rows: Option<usize>,
    },
    /// Clean each file and write it in another format
    Process {
        /// CSV (.csv) or Excel (.xlsx) files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Drop rows that repeat an earlier row exactly
        #[arg(long)]
        dedup: bool,

        /// Replace missing numeric values with the column mean
        #[arg(long)]
        fill_missing: bool,

        /// Keep only these columns, in this order
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Print the first numeric columns of each file
        #[arg(long)]
        chart: bool,

        /// Output format (csv or excel). Defaults to the `default_target` setting.
        #[arg(long)]
        to: Option<TargetFormat>,

        /// Directory for converted files. Defaults to the `output_dir` setting,
        /// then the current directory.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Options for one `process` run, resolved against the settings.
#[derive(Debug)]
struct ProcessPlan {
    dedup: bool,
    fill_missing: bool,
    columns: Option<Vec<String>>,
    chart: bool,
    target: TargetFormat,
    output_dir: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = config::load_settings(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Preview { files, rows } => {
            let rows = rows.unwrap_or(settings.preview_rows);
            handle_preview(&settings, &files, rows)
        }
        Commands::Process {
            files,
            dedup,
            fill_missing,
            columns,
            chart,
            to,
            output_dir,
        } => {
            let plan = ProcessPlan {
                dedup,
                fill_missing,
                columns,
                chart,
                target: to.unwrap_or(settings.default_target),
                output_dir: output_dir
                    .or_else(|| settings.output_dir.clone())
                    .unwrap_or_else(|| PathBuf::from(".")),
            };
            handle_process(&settings, &files, &plan)
        }
    }
}

/// Uploads every path in order. A path that cannot be read joins the batch
/// as an errored file so its siblings are still processed.
fn upload_all(session: &mut Session, files: &[PathBuf]) -> Vec<FileId> {
    files
        .iter()
        .map(|path| match UploadedFile::from_path(path) {
            Ok(file) => session.upload(file),
            Err(err) => {
                let err = SweeperError::Io(std::io::Error::new(
                    err.kind(),
                    format!("Failed to read {}: {err}", path.display()),
                ));
                session.upload_failed(upload_name(path), err)
            }
        })
        .collect()
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn handle_preview(settings: &SweeperSettings, files: &[PathBuf], rows: usize) -> Result<()> {
    let mut session = Session::with_settings(settings);
    for id in upload_all(&mut session, files) {
        let name = session.file_name(id)?.to_owned();
        if let Ok(head) = session.preview(id, rows) {
            println!("{name}\n{head}\n");
        }
    }
    print_notices(&mut session);
    Ok(())
}

fn handle_process(settings: &SweeperSettings, files: &[PathBuf], plan: &ProcessPlan) -> Result<()> {
    std::fs::create_dir_all(&plan.output_dir).with_context(|| {
        format!("Failed to create output directory {}", plan.output_dir.display())
    })?;

    let mut session = Session::with_settings(settings);
    for id in upload_all(&mut session, files) {
        process_file(&mut session, id, plan)?;
    }
    print_notices(&mut session);
    Ok(())
}

/// Runs the requested steps on one file. A failed step is already recorded
/// as a notice, so only writing the output can fail here.
fn process_file(session: &mut Session, id: FileId, plan: &ProcessPlan) -> Result<()> {
    if session.error(id)?.is_some() {
        return Ok(());
    }

    if plan.dedup {
        let _report = session.remove_duplicates(id);
    }
    if plan.fill_missing {
        let _report = session.fill_missing(id);
    }
    if let Some(columns) = &plan.columns
        && session.select_columns(id, columns).is_err()
    {
        return Ok(());
    }
    if plan.chart
        && let Ok(Visualization::Chart(chart)) = session.visualize(id)
    {
        println!("{}\n{}", session.file_name(id)?, render_chart(&chart));
    }

    if let Ok(output) = session.convert(id, plan.target) {
        let path = plan.output_dir.join(&output.filename);
        write_output(&path, &output.bytes)?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_notices(session: &mut Session) {
    for notice in session.finish() {
        println!("{notice}");
    }
}

/// Formats an optional value to 4 decimal places, or "-" when missing.
fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.4}"),
        _ => "-".to_owned(),
    }
}

/// One line per row: the row index followed by each series' value.
fn render_chart(chart: &ChartData) -> String {
    let mut out = String::from("row");
    for series in &chart.series {
        out.push('\t');
        out.push_str(&series.name);
    }

    for row in 0..chart.row_count {
        out.push('\n');
        out.push_str(&row.to_string());
        for series in &chart.series {
            out.push('\t');
            out.push_str(&fmt_opt(series.values.get(row).copied().flatten()));
        }
    }
    out
}
