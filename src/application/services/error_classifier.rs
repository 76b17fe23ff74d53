use std::error::Error;

use crate::domain::ErrorKind;

/// A failure that already knows its place in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PipelineError {
    kind: ErrorKind,
    message: String,
}

impl PipelineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Maps any error to an [`ErrorKind`]. Typed pipeline errors anywhere in the
/// source chain win; everything else is classified from its message.
pub fn classify(error: &(dyn Error + 'static)) -> ErrorKind {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(pipeline_error) = err.downcast_ref::<PipelineError>() {
            return pipeline_error.kind();
        }
        current = err.source();
    }
    classify_message(&error.to_string())
}

pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();

    if contains_any(&lower, &["timeout", "timed out", "abort"]) {
        ErrorKind::ProcessingTimeout
    } else if contains_any(&lower, &["too large", "file size", "payload too"]) {
        ErrorKind::FileTooLarge
    } else if contains_any(&lower, &["format", "unsupported"]) {
        ErrorKind::InvalidFormat
    } else if lower.contains("not found") {
        ErrorKind::UserNotFound
    } else if lower.contains("not approved") {
        ErrorKind::UserNotApproved
    } else {
        ErrorKind::GeneralError
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
