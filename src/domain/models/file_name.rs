use std::fmt;

use thiserror::Error;

/// Longest name most filesystems accept for a single path component.
pub const MAX_FILE_NAME_BYTES: usize = 255;

const ALLOWED_PUNCTUATION: [char; 6] = ['.', '-', '_', ' ', '(', ')'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileNameError {
    #[error("File name is empty")]
    Empty,

    #[error("File name exceeds {MAX_FILE_NAME_BYTES} bytes")]
    TooLong,

    #[error("File name '{0}' points outside the storage directory")]
    Traversal(String),

    #[error("File name '{0}' is hidden")]
    Hidden(String),

    #[error("File name '{0}' has leading or trailing whitespace")]
    Whitespace(String),

    #[error("File name contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A client supplied name that is safe to join onto the storage directory.
///
/// The only way to obtain one is [`FileName::parse`], which rejects rather than
/// rewrites anything suspicious: path separators, `.`/`..`, hidden names and
/// characters outside a small portable set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileName(String);

impl FileName {
    pub fn parse(raw: &str) -> Result<Self, FileNameError> {
        if raw.is_empty() {
            return Err(FileNameError::Empty);
        }
        if raw.len() > MAX_FILE_NAME_BYTES {
            return Err(FileNameError::TooLong);
        }
        if raw == "." || raw == ".." || raw.contains(['/', '\\']) {
            return Err(FileNameError::Traversal(raw.to_string()));
        }
        if raw.starts_with('.') {
            return Err(FileNameError::Hidden(raw.to_string()));
        }
        if raw.trim() != raw {
            return Err(FileNameError::Whitespace(raw.to_string()));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !c.is_alphanumeric() && !ALLOWED_PUNCTUATION.contains(c))
        {
            return Err(FileNameError::InvalidCharacter(c));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.0
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.0)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    /// Path under which the browser pages and the API serve this file.
    pub fn view_url(&self) -> String {
        format!("/uploads/{}", urlencoding::encode(&self.0))
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        for name in ["notes.txt", "photo-2024_01.jpg", "My Report (final).pdf", "résumé.pdf", "README"] {
            let parsed = FileName::parse(name).unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_rejects_traversal() {
        for name in ["../../etc/passwd", "..", ".", "/etc/passwd", "a/b.txt", "..\\boot.ini", "C:\\x.txt"] {
            assert!(
                matches!(FileName::parse(name), Err(FileNameError::Traversal(_))),
                "{name} should be rejected as traversal"
            );
        }
    }

    #[test]
    fn test_rejects_hidden_and_temp_names() {
        assert!(matches!(FileName::parse(".env"), Err(FileNameError::Hidden(_))));
        assert!(matches!(
            FileName::parse(".upload-1234.tmp"),
            Err(FileNameError::Hidden(_))
        ));
    }

    #[test]
    fn test_rejects_bad_characters_and_shapes() {
        assert_eq!(FileName::parse(""), Err(FileNameError::Empty));
        assert_eq!(
            FileName::parse(&"a".repeat(MAX_FILE_NAME_BYTES + 1)),
            Err(FileNameError::TooLong)
        );
        assert_eq!(
            FileName::parse("C:boot.ini"),
            Err(FileNameError::InvalidCharacter(':'))
        );
        assert_eq!(
            FileName::parse("bad\0name"),
            Err(FileNameError::InvalidCharacter('\0'))
        );
        assert_eq!(
            FileName::parse("<script>.html"),
            Err(FileNameError::InvalidCharacter('<'))
        );
        assert!(matches!(
            FileName::parse(" padded.txt"),
            Err(FileNameError::Whitespace(_))
        ));
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(FileName::parse("notes.txt").unwrap().content_type(), "text/plain");
        assert_eq!(FileName::parse("cat.PNG").unwrap().content_type(), "image/png");
        assert_eq!(FileName::parse("doc.pdf").unwrap().content_type(), "application/pdf");
        assert_eq!(
            FileName::parse("blob.unknownext").unwrap().content_type(),
            "application/octet-stream"
        );
        assert_eq!(
            FileName::parse("Makefile").unwrap().content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_extension_and_view_url() {
        let name = FileName::parse("My Photo.JPG").unwrap();
        assert_eq!(name.extension().as_deref(), Some("jpg"));
        assert_eq!(name.view_url(), "/uploads/My%20Photo.JPG");
        assert_eq!(FileName::parse("README").unwrap().extension(), None);
        assert_eq!(FileName::parse("trailing.").unwrap().extension(), None);
    }
}
