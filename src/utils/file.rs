//! File helpers for ingestion.

use std::path::Path;

use crate::error::ExtractError;

/// Upload kinds the knowledge base accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    /// `.txt`, `.md`, and `.json`. JSON is not parsed structurally, only
    /// decoded as text.
    Text,
}

impl FileKind {
    /// Detect the kind from the file extension.
    pub fn detect(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "txt" | "md" | "json" => Ok(FileKind::Text),
            _ => Err(ExtractError::UnsupportedKind(
                path.display().to_string(),
            )),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::detect(path).is_ok()
    }
}

/// Default document title when none is supplied: the file name without its
/// extension.
pub fn default_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// The file name stored as the point's source reference.
pub fn source_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_supported_kinds() {
        assert_eq!(
            FileKind::detect(&PathBuf::from("report.pdf")).unwrap(),
            FileKind::Pdf
        );
        assert_eq!(
            FileKind::detect(&PathBuf::from("notes.TXT")).unwrap(),
            FileKind::Text
        );
        assert_eq!(
            FileKind::detect(&PathBuf::from("guide.md")).unwrap(),
            FileKind::Text
        );
        assert_eq!(
            FileKind::detect(&PathBuf::from("data.json")).unwrap(),
            FileKind::Text
        );
    }

    #[test]
    fn test_detect_rejects_other_kinds() {
        assert!(FileKind::detect(&PathBuf::from("image.png")).is_err());
        assert!(FileKind::detect(&PathBuf::from("no_extension")).is_err());
        assert!(!FileKind::is_supported(&PathBuf::from("archive.zip")));
    }

    #[test]
    fn test_default_title_strips_extension() {
        assert_eq!(default_title(&PathBuf::from("/tmp/User Guide.pdf")), "User Guide");
    }

    #[test]
    fn test_source_file_name() {
        assert_eq!(
            source_file_name(&PathBuf::from("/tmp/uploads/guide.pdf")),
            "guide.pdf"
        );
    }
}
