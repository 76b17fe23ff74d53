use crate::domain::{AudioReference, ErrorKind};

use super::PipelineError;

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 15 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 6] = ["m4a", "mp3", "wav", "ogg", "aac", "flac"];

const ALLOWED_MIME_TYPES: [&str; 16] = [
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/vnd.wave",
    "audio/ogg",
    "application/ogg",
    "audio/aac",
    "audio/x-aac",
    "audio/aacp",
    "audio/flac",
    "audio/x-flac",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid { kind: ErrorKind, message: String },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn into_result(self) -> Result<(), PipelineError> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid { kind, message } => Err(PipelineError::new(kind, message)),
        }
    }
}

/// Size and format policy, checked before any network I/O.
#[derive(Debug, Clone, Copy)]
pub struct AudioValidator {
    max_size_bytes: u64,
}

impl AudioValidator {
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn validate(&self, audio: &AudioReference) -> ValidationOutcome {
        if audio.size_bytes > self.max_size_bytes {
            return ValidationOutcome::Invalid {
                kind: ErrorKind::FileTooLarge,
                message: format!(
                    "{} is {} but the limit is {}",
                    audio.filename,
                    format_megabytes(audio.size_bytes),
                    format_megabytes(self.max_size_bytes)
                ),
            };
        }

        if !is_supported_format(audio) {
            return ValidationOutcome::Invalid {
                kind: ErrorKind::InvalidFormat,
                message: format!(
                    "{} ({}) is not a supported audio format; expected one of {}",
                    audio.filename,
                    audio.content_type,
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            };
        }

        ValidationOutcome::Valid
    }
}

impl Default for AudioValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE_BYTES)
    }
}

/// Extension OR MIME type must be allowed; mail clients mislabel attachments.
pub fn is_supported_format(audio: &AudioReference) -> bool {
    let extension_ok = audio
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    let mime_ok = ALLOWED_MIME_TYPES.contains(&audio.mime_essence().as_str());
    extension_ok || mime_ok
}

fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
