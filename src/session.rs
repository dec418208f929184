//! Per-batch orchestration of uploaded files.
//!
//! A [`Session`] owns one working table per uploaded file and routes every
//! user action to that file alone. Failures are recorded as [`Notice`]s and
//! never leak into other files of the batch:
//!
//! ```no_run
//! use sweeper::logic::{TargetFormat, UploadedFile};
//! use sweeper::session::Session;
//!
//! # fn main() -> sweeper::error::Result<()> {
//! let mut session = Session::default();
//! let ids = session.upload_batch(vec![
//!     UploadedFile::new("a.csv", b"x\n1\n1\n".to_vec()),
//!     UploadedFile::new("c.txt", b"hello".to_vec()),
//! ]);
//!
//! session.remove_duplicates(ids[0])?;
//! let output = session.convert(ids[0], TargetFormat::Excel)?;
//! assert_eq!(output.filename, "a.xlsx");
//!
//! for notice in session.finish() {
//!     println!("{notice}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod notice;
pub mod state;

pub use notice::{Notice, NoticeLevel};
pub use state::{FileId, FileStage};

use crate::config::SweeperSettings;
use crate::error::{Result, SweeperError};
use crate::logic::{
    self, CleaningReport, ConversionRequest, ConversionResult, FileFormat, LoadOptions,
    TargetFormat, UploadedFile, Visualization,
};
use polars::prelude::DataFrame;
use state::FileEntry;
use std::collections::HashMap;

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const ALL_PROCESSED: &str = "All files processed successfully!";
pub const NO_NUMERIC_COLUMNS: &str = "No numeric columns found for visualization.";

#[derive(Debug, Default)]
pub struct Session {
    load_options: LoadOptions,
    order: Vec<FileId>,
    files: HashMap<FileId, FileEntry>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(load_options: LoadOptions) -> Self {
        Self {
            load_options,
            ..Self::default()
        }
    }

    pub fn with_settings(settings: &SweeperSettings) -> Self {
        Self::new(settings.load_options())
    }

    /// Detects the format of `file` and loads it into a working table.
    ///
    /// Always returns a handle; a file that cannot be loaded is kept in the
    /// `Errored` stage with an error notice.
    pub fn upload(&mut self, file: UploadedFile) -> FileId {
        let mut entry = FileEntry::detected(file.name.clone(), logic::detect_format(&file.name));

        match logic::load_upload(&file, &self.load_options) {
            Ok(table) => {
                tracing::info!(
                    "Loaded {} ({} rows, {} columns)",
                    file.name,
                    table.height(),
                    table.width()
                );
                entry.table = Some(table);
                entry.stage = FileStage::Loaded;
            }
            Err(err) => self.reject(&mut entry, err),
        }

        self.insert(entry)
    }

    /// Records a file whose content could not be obtained, e.g. an
    /// unreadable path. The file joins the batch in the `Errored` stage.
    pub fn upload_failed(&mut self, name: impl Into<String>, err: SweeperError) -> FileId {
        let name = name.into();
        let mut entry = FileEntry::detected(name.clone(), logic::detect_format(&name));
        self.reject(&mut entry, err);
        self.insert(entry)
    }

    fn reject(&mut self, entry: &mut FileEntry, err: SweeperError) {
        tracing::error!("Failed to load {}: {}", entry.name, err);
        self.notices
            .push(Notice::error(Some(&entry.name), err.to_string()));
        entry.fail(err);
    }

    fn insert(&mut self, entry: FileEntry) -> FileId {
        let id = FileId::new();
        self.order.push(id);
        self.files.insert(id, entry);
        id
    }

    /// Uploads every file in order; one file failing never affects another.
    pub fn upload_batch(&mut self, files: Vec<UploadedFile>) -> Vec<FileId> {
        files.into_iter().map(|file| self.upload(file)).collect()
    }

    /// First `rows` rows of the working table.
    pub fn preview(&self, id: FileId, rows: usize) -> Result<DataFrame> {
        Ok(self.entry(id)?.table()?.head(Some(rows)))
    }

    pub fn remove_duplicates(&mut self, id: FileId) -> Result<CleaningReport> {
        let (name, outcome) = {
            let entry = self.entry_mut(id)?;
            let outcome = entry.transform(FileStage::Cleaned, |table| {
                let deduped = logic::remove_duplicate_rows(table)?;
                let report = CleaningReport {
                    rows_removed: table.height().saturating_sub(deduped.height()),
                    cells_filled: 0,
                };
                Ok((deduped, report))
            });
            (entry.name.clone(), outcome)
        };

        self.settle(&name, outcome, |report| {
            tracing::info!("Removed {} duplicate rows from {}", report.rows_removed, name);
            Some(Notice::success(
                Some(&name),
                format!("Duplicates removed for {name}!"),
            ))
        })
    }

    pub fn fill_missing(&mut self, id: FileId) -> Result<CleaningReport> {
        let (name, outcome) = {
            let entry = self.entry_mut(id)?;
            let outcome = entry.transform(FileStage::Cleaned, |table| {
                let (filled, cells_filled) = logic::fill_missing_numeric_counted(table)?;
                let report = CleaningReport {
                    rows_removed: 0,
                    cells_filled,
                };
                Ok((filled, report))
            });
            (entry.name.clone(), outcome)
        };

        self.settle(&name, outcome, |report| {
            tracing::info!("Filled {} missing cells in {}", report.cells_filled, name);
            Some(Notice::success(
                Some(&name),
                format!("Missing values filled for {name}!"),
            ))
        })
    }

    /// Restricts the working table to `names`, in that order.
    pub fn select_columns(&mut self, id: FileId, names: &[String]) -> Result<()> {
        let (name, outcome) = {
            let entry = self.entry_mut(id)?;
            let outcome = entry.transform(FileStage::Projected, |table| {
                Ok((logic::select_columns(table, names)?, ()))
            });
            (entry.name.clone(), outcome)
        };

        self.settle(&name, outcome, |()| {
            tracing::debug!("Selected columns {:?} from {}", names, name);
            None
        })
    }

    pub fn visualize(&mut self, id: FileId) -> Result<Visualization> {
        let (name, outcome) = {
            let entry = self.entry_mut(id)?;
            let outcome = entry.inspect(FileStage::Visualized, logic::chart_series);
            (entry.name.clone(), outcome)
        };

        self.settle(&name, outcome, |viz| match viz {
            Visualization::Chart(_) => None,
            Visualization::NoNumericData => {
                tracing::warn!("{}: {}", name, NO_NUMERIC_COLUMNS);
                Some(Notice::warning(Some(&name), NO_NUMERIC_COLUMNS))
            }
        })
    }

    pub fn convert(&mut self, id: FileId, target: TargetFormat) -> Result<ConversionResult> {
        let (name, outcome) = {
            let entry = self.entry_mut(id)?;
            let request = ConversionRequest::new(target, &entry.name);
            let outcome = entry.inspect(FileStage::Converted, |table| {
                logic::encode_table(table, &request)
            });
            (entry.name.clone(), outcome)
        };

        self.settle(&name, outcome, |result| {
            tracing::info!(
                "Converted {} to {} ({} bytes)",
                name,
                result.filename,
                result.bytes.len()
            );
            Some(Notice::success(
                Some(&name),
                format!("Conversion successful for {name}!"),
            ))
        })
    }

    /// Ends the batch and hands back every notice raised since it started.
    ///
    /// The closing notice is emitted even when some files errored; their
    /// error notices precede it.
    pub fn finish(&mut self) -> Vec<Notice> {
        for id in &self.order {
            if let Some(entry) = self.files.get_mut(id)
                && entry.stage != FileStage::Errored
            {
                entry.stage = FileStage::Done;
            }
        }
        tracing::info!("Finished batch of {} files", self.order.len());
        self.notices.push(Notice::success(None, ALL_PROCESSED));
        std::mem::take(&mut self.notices)
    }

    pub fn stage(&self, id: FileId) -> Result<FileStage> {
        Ok(self.entry(id)?.stage)
    }

    /// Handles in upload order.
    pub fn file_ids(&self) -> &[FileId] {
        &self.order
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn file_name(&self, id: FileId) -> Result<&str> {
        Ok(&self.entry(id)?.name)
    }

    pub fn format(&self, id: FileId) -> Result<FileFormat> {
        Ok(self.entry(id)?.format)
    }

    /// The error that put a file in `Errored`, if any.
    pub fn error(&self, id: FileId) -> Result<Option<&SweeperError>> {
        Ok(self.entry(id)?.error.as_ref())
    }

    pub fn columns(&self, id: FileId) -> Result<Vec<String>> {
        Ok(logic::column_names(self.entry(id)?.table()?))
    }

    fn entry(&self, id: FileId) -> Result<&FileEntry> {
        self.files
            .get(&id)
            .ok_or_else(|| SweeperError::UnknownFile(id.to_string()))
    }

    fn entry_mut(&mut self, id: FileId) -> Result<&mut FileEntry> {
        self.files
            .get_mut(&id)
            .ok_or_else(|| SweeperError::UnknownFile(id.to_string()))
    }

    fn settle<T>(
        &mut self,
        name: &str,
        outcome: Result<T>,
        on_success: impl FnOnce(&T) -> Option<Notice>,
    ) -> Result<T> {
        match outcome {
            Ok(value) => {
                if let Some(notice) = on_success(&value) {
                    self.notices.push(notice);
                }
                Ok(value)
            }
            Err(err) => {
                tracing::error!("{}: {}", name, err);
                self.notices.push(Notice::error(Some(name), err.to_string()));
                Err(err)
            }
        }
    }
}
