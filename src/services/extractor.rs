//! Text extraction from uploaded documents (PDF and plain text).

use std::fs;
use std::path::Path;

use lopdf::Document as PdfDocument;

use crate::error::ExtractError;
use crate::utils::file::FileKind;

/// Extract the text content of a supported file, dispatching on its kind.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    match FileKind::detect(path)? {
        FileKind::Pdf => extract_pdf(path),
        FileKind::Text => extract_plain_text(path),
    }
}

/// Extract text from every page of a PDF, separating pages with a blank
/// line.
///
/// A page that yields no extractable text contributes an empty string and
/// never aborts the rest of the document; only a PDF that cannot be opened
/// or parsed fails the extraction.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let doc = PdfDocument::load(path).map_err(|e| ExtractError::Pdf {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut content = String::new();
    for page_number in doc.get_pages().keys() {
        content.push_str(&doc.extract_text(&[*page_number]).unwrap_or_default());
        content.push_str("\n\n");
    }
    Ok(content)
}

/// Read a text file as UTF-8, falling back to Latin-1 when the bytes are
/// not valid UTF-8.
///
/// Latin-1 maps every byte to a char, so the fallback cannot fail; only
/// the read itself can.
pub fn extract_plain_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).map_err(|e| ExtractError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_plain_text_utf8() {
        let file = temp_file(".txt", "héllo wörld".as_bytes());
        assert_eq!(extract_text(file.path()).unwrap(), "héllo wörld");
    }

    #[test]
    fn test_plain_text_latin1_fallback() {
        // "café" encoded as Latin-1: 0xE9 is not valid UTF-8 on its own.
        let file = temp_file(".txt", b"caf\xe9");
        assert_eq!(extract_text(file.path()).unwrap(), "café");
    }

    #[test]
    fn test_latin1_fallback_accepts_any_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let file = temp_file(".md", &bytes);
        let text = extract_text(file.path()).unwrap();
        assert_eq!(text.chars().count(), 256);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = extract_plain_text(Path::new("/nonexistent/notes.txt"));
        assert!(matches!(result, Err(ExtractError::Io { .. })));
    }

    #[test]
    fn test_garbage_pdf_is_parse_error() {
        let file = temp_file(".pdf", b"this is not a pdf");
        let result = extract_text(file.path());
        assert!(matches!(result, Err(ExtractError::Pdf { .. })));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let file = temp_file(".png", b"\x89PNG");
        let result = extract_text(file.path());
        assert!(matches!(result, Err(ExtractError::UnsupportedKind(_))));
    }
}
