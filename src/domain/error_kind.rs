use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed failure taxonomy. Every user-facing failure resolves to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileTooLarge,
    InvalidFormat,
    DownloadTimeout,
    ProcessingTimeout,
    WhisperTimeout,
    UserNotFound,
    UserNotApproved,
    GeneralError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::FileTooLarge,
        ErrorKind::InvalidFormat,
        ErrorKind::DownloadTimeout,
        ErrorKind::ProcessingTimeout,
        ErrorKind::WhisperTimeout,
        ErrorKind::UserNotFound,
        ErrorKind::UserNotApproved,
        ErrorKind::GeneralError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileTooLarge => "file_too_large",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::DownloadTimeout => "download_timeout",
            ErrorKind::ProcessingTimeout => "processing_timeout",
            ErrorKind::WhisperTimeout => "whisper_timeout",
            ErrorKind::UserNotFound => "user_not_found",
            ErrorKind::UserNotApproved => "user_not_approved",
            ErrorKind::GeneralError => "general_error",
        }
    }

    /// HTTP status code reported to the trigger for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::FileTooLarge | ErrorKind::InvalidFormat => 400,
            ErrorKind::UserNotFound => 404,
            ErrorKind::UserNotApproved => 403,
            ErrorKind::DownloadTimeout
            | ErrorKind::ProcessingTimeout
            | ErrorKind::WhisperTimeout
            | ErrorKind::GeneralError => 500,
        }
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Invalid error kind: {}", s))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
