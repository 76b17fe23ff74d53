use crate::domain::{EnhancementKind, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub name: &'static str,
    pub subject: String,
    pub body: String,
}

fn describe(filename: Option<&str>) -> String {
    match filename {
        Some(name) if !name.is_empty() => format!("your voice note \"{}\"", name),
        _ => "your voice note".to_string(),
    }
}

pub fn success_template(filename: &str, transcript: &str) -> EmailTemplate {
    EmailTemplate {
        name: "transcription_success",
        subject: format!("Transcript: {}", filename),
        body: format!(
            "Here is the transcript of {}:\n\n{}\n",
            describe(Some(filename)),
            transcript
        ),
    }
}

/// One fixed template per kind, each with a next step the user can take.
pub fn error_template(kind: ErrorKind, filename: Option<&str>) -> EmailTemplate {
    let note = describe(filename);
    let (name, subject, body) = match kind {
        ErrorKind::FileTooLarge => (
            "error_file_too_large",
            "Your voice note is too large",
            format!(
                "We couldn't transcribe {} because it is larger than we can accept.\n\n\
                 Try a shorter recording, or split it into several notes.",
                note
            ),
        ),
        ErrorKind::InvalidFormat => (
            "error_invalid_format",
            "We couldn't read your attachment",
            format!(
                "We couldn't find a supported audio file in {}.\n\n\
                 Please attach an m4a, mp3, wav, ogg, aac or flac recording and send it again.",
                note
            ),
        ),
        ErrorKind::DownloadTimeout => (
            "error_download_timeout",
            "Your voice note took too long to download",
            format!(
                "We couldn't download {} in time.\n\n\
                 Please send it again; if it keeps happening, try a shorter recording.",
                note
            ),
        ),
        ErrorKind::ProcessingTimeout => (
            "error_processing_timeout",
            "Your voice note took too long to process",
            format!(
                "Processing {} ran out of time.\n\n\
                 Please try again in a few minutes, or send a shorter recording.",
                note
            ),
        ),
        ErrorKind::WhisperTimeout => (
            "error_whisper_timeout",
            "Transcription timed out",
            format!(
                "The transcription service didn't finish {} in time.\n\n\
                 Try a shorter recording, or send it again later.",
                note
            ),
        ),
        ErrorKind::UserNotFound => (
            "error_user_not_found",
            "We don't recognise this address",
            "We couldn't find an account for the address you wrote to.\n\n\
             Check the address in your account settings and try again."
                .to_string(),
        ),
        ErrorKind::UserNotApproved => (
            "error_user_not_approved",
            "Your account is awaiting approval",
            format!(
                "We received {}, but your account hasn't been approved yet.\n\n\
                 You'll get an email as soon as it is; send the note again after that.",
                note
            ),
        ),
        ErrorKind::GeneralError => (
            "error_general",
            "We couldn't transcribe your voice note",
            format!(
                "Something went wrong while transcribing {}.\n\n\
                 Please send it again. If the recording is silent or very short, \
                 try recording a little more.",
                note
            ),
        ),
    };

    EmailTemplate {
        name,
        subject: subject.to_string(),
        body,
    }
}

pub fn enhancement_template(
    kind: EnhancementKind,
    filename: &str,
    content: &str,
    original: &str,
) -> EmailTemplate {
    EmailTemplate {
        name: match kind {
            EnhancementKind::Cleanup => "enhancement_cleanup",
            EnhancementKind::Summary => "enhancement_summary",
        },
        subject: format!("{}: {}", kind.label(), filename),
        body: format!(
            "{label} version of {note}:\n\n{content}\n\n---\nOriginal transcript:\n\n{original}\n",
            label = kind.label(),
            note = describe(Some(filename)),
        ),
    }
}

pub fn enhancement_failure_template(kind: EnhancementKind, filename: &str) -> EmailTemplate {
    EmailTemplate {
        name: "enhancement_failed",
        subject: format!("{} unavailable: {}", kind.label(), filename),
        body: format!(
            "We couldn't produce the {} version of {}.\n\n\
             Your original transcript was delivered separately and is unaffected.",
            kind.label().to_lowercase(),
            describe(Some(filename))
        ),
    }
}
