//! File input adapter.
//!
//! A picker dialog and a drag-and-drop gesture both end in the same event: a
//! `FileCandidate`. The advisory PDF filter turns that into a `PdfFile` or
//! drops it; the controller only ever sees `PdfFile` and never learns which
//! gesture produced it. The filter is not a security boundary.

pub const PDF_MIME: &str = "application/pdf";

/// Gesture that produced a file selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Picker,
    Drop,
}

/// A file as reported by the host before filtering.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub origin: FileOrigin,
}

/// A file that passed the PDF filter and can be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    name: String,
    bytes: Vec<u8>,
}

impl PdfFile {
    /// Apply the PDF filter. Accepts a candidate whose MIME type is
    /// `application/pdf` or whose name ends in `.pdf`.
    pub fn accept(candidate: FileCandidate) -> Option<Self> {
        if !is_pdf(&candidate.name, candidate.content_type.as_deref()) {
            tracing::debug!(
                name = %candidate.name,
                origin = ?candidate.origin,
                "file rejected by pdf filter"
            );
            return None;
        }
        Some(Self {
            name: candidate.name,
            bytes: candidate.bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn is_pdf(name: &str, content_type: Option<&str>) -> bool {
    let mime_ok = content_type
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or("")
                .trim()
                .eq_ignore_ascii_case(PDF_MIME)
        })
        .unwrap_or(false);
    mime_ok || name.to_ascii_lowercase().ends_with(".pdf")
}
