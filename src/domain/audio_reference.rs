/// An attachment announced by an inbound trigger. Lives for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReference {
    pub filename: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub location: String,
}

impl AudioReference {
    pub fn new(
        filename: impl Into<String>,
        size_bytes: u64,
        content_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            size_bytes,
            content_type: content_type.into(),
            location: location.into(),
        }
    }

    /// Lowercased extension without the dot, if the filename has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Declared MIME type without parameters, lowercased.
    pub fn mime_essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}
