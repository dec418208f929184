//! User-facing signals produced by session commands.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// The file the notice is about; `None` for batch-wide notices.
    pub file: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn success(file: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, file, message)
    }

    pub fn warning(file: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, file, message)
    }

    pub fn error(file: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, file, message)
    }

    fn new(level: NoticeLevel, file: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level,
            file: file.map(str::to_owned),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{}] {file}: {}", self.level.as_str(), self.message),
            None => write!(f, "[{}] {}", self.level.as_str(), self.message),
        }
    }
}
