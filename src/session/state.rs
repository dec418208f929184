//! Per-file state held by a [`super::Session`].

use crate::error::{Result, SweeperError};
use crate::logic::FileFormat;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle naming one uploaded file within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a file is in its pipeline.
///
/// Steps after `Loaded` are optional and may happen in any order; the stage
/// records the most recent successful one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStage {
    Detected,
    Loaded,
    Cleaned,
    Projected,
    Visualized,
    Converted,
    Done,
    Errored,
}

impl FileStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detected => "Detected",
            Self::Loaded => "Loaded",
            Self::Cleaned => "Cleaned",
            Self::Projected => "Projected",
            Self::Visualized => "Visualized",
            Self::Converted => "Converted",
            Self::Done => "Done",
            Self::Errored => "Errored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }
}

impl std::fmt::Display for FileStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
pub(super) struct FileEntry {
    pub name: String,
    pub format: FileFormat,
    pub stage: FileStage,
    pub table: Option<DataFrame>,
    pub error: Option<SweeperError>,
}

impl FileEntry {
    pub fn detected(name: String, format: FileFormat) -> Self {
        Self {
            name,
            format,
            stage: FileStage::Detected,
            table: None,
            error: None,
        }
    }

    pub fn fail(&mut self, err: SweeperError) {
        self.stage = FileStage::Errored;
        self.table = None;
        self.error = Some(err);
    }

    /// The working table, or the error that put this file in `Errored`.
    pub fn table(&self) -> Result<&DataFrame> {
        match (&self.table, &self.error) {
            (Some(table), _) => Ok(table),
            (None, Some(err)) => Err(err.clone()),
            (None, None) => Err(SweeperError::Parse(format!(
                "{} has not been loaded",
                self.name
            ))),
        }
    }

    /// Runs a transformation and, on success, makes its output the working
    /// table. A failure leaves the current table in place.
    pub fn transform<T>(
        &mut self,
        stage: FileStage,
        f: impl FnOnce(&DataFrame) -> Result<(DataFrame, T)>,
    ) -> Result<T> {
        let (table, out) = f(self.table()?)?;
        self.table = Some(table);
        self.stage = stage;
        Ok(out)
    }

    /// Runs a read-only step over the working table.
    pub fn inspect<T>(
        &mut self,
        stage: FileStage,
        f: impl FnOnce(&DataFrame) -> Result<T>,
    ) -> Result<T> {
        let out = f(self.table()?)?;
        self.stage = stage;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_failed_transform_keeps_table() {
        let mut entry = FileEntry::detected("a.csv".to_owned(), FileFormat::Csv);
        entry.table = Some(df!("x" => &[1, 2]).unwrap());
        entry.stage = FileStage::Loaded;

        let result: Result<()> = entry.transform(FileStage::Projected, |_| {
            Err(SweeperError::ColumnNotFound("y".to_owned()))
        });

        assert!(result.is_err());
        assert_eq!(entry.stage, FileStage::Loaded);
        assert_eq!(entry.table().unwrap().height(), 2);
    }

    #[test]
    fn test_errored_entry_returns_recorded_error() {
        let mut entry = FileEntry::detected("c.txt".to_owned(), FileFormat::Unsupported);
        entry.fail(SweeperError::UnsupportedFormat {
            extension: ".txt".to_owned(),
        });

        let err = entry.table().unwrap_err();
        assert!(matches!(err, SweeperError::UnsupportedFormat { .. }));
        assert!(entry.stage.is_terminal());
    }

    #[test]
    fn test_file_ids_are_unique() {
        assert_ne!(FileId::new(), FileId::new());
    }
}
