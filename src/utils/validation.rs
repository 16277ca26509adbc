use std::path::Path;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// Storage name used when sanitization leaves nothing usable
const FALLBACK_FILENAME: &str = "resume.pdf";

/// Checks whether a filename carries an allowed extension.
///
/// The check is purely lexical: the substring after the last `.` is compared
/// case-insensitively against [`ALLOWED_EXTENSIONS`]. Names without a dot
/// (and names ending in one) fail.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Sanitizes a client-supplied filename for use as a storage name.
///
/// Keeps only the last path component, replaces control and reserved
/// characters with `_`, trims leading dots, and truncates to 255 bytes on a
/// char boundary. Never returns an empty string.
pub fn sanitize_filename(filename: &str) -> String {
    // Get only the filename component (remove any path)
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", filename);
    }

    // We allow most Unicode characters but block path separators and reserved characters
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || matches!(
                    c,
                    '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';'
                )
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // A leading dot would hide the file on disk
    let sanitized = sanitized.trim_start_matches('.').to_string();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    if sanitized.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file_accepts_pdf_case_insensitively() {
        assert!(allowed_file("resume.pdf"));
        assert!(allowed_file("resume.PDF"));
        assert!(allowed_file("resume.Pdf"));
        assert!(allowed_file("my resume (final).pdf"));
    }

    #[test]
    fn test_allowed_file_rejects_other_extensions() {
        assert!(!allowed_file("resume.docx"));
        assert!(!allowed_file("resume.txt"));
        assert!(!allowed_file("resume.pdf.exe"));
    }

    #[test]
    fn test_allowed_file_rejects_names_without_extension() {
        assert!(!allowed_file("resume"));
        assert!(!allowed_file("pdf"));
        assert!(!allowed_file(""));
        assert!(!allowed_file("resume."));
    }

    #[test]
    fn test_allowed_file_uses_last_dot_only() {
        assert!(allowed_file("resume.backup.pdf"));
        assert!(allowed_file(".pdf"));
        assert!(!allowed_file("archive.pdf.tar"));
    }

    #[test]
    fn test_sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_filename("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("my resume.pdf"), "my resume.pdf");
        assert_eq!(sanitize_filename("简历.pdf"), "简历.pdf");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("/tmp/upload.pdf"), "upload.pdf");
        assert_eq!(sanitize_filename("..\\evil.pdf"), "_evil.pdf");
    }

    #[test]
    fn test_sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_filename("re<su>me?.pdf"), "re_su_me_.pdf");
        assert_eq!(sanitize_filename("a:b|c.pdf"), "a_b_c.pdf");
        assert_eq!(sanitize_filename("cv;rm -rf.pdf"), "cv_rm -rf.pdf");
    }

    #[test]
    fn test_sanitize_trims_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.pdf"), "hidden.pdf");
    }

    #[test]
    fn test_sanitize_never_returns_empty() {
        assert_eq!(sanitize_filename(""), "resume.pdf");
        assert_eq!(sanitize_filename("..."), "resume.pdf");
        assert_eq!(sanitize_filename("///"), "resume.pdf");
    }

    #[test]
    fn test_sanitize_caps_length_on_char_boundary() {
        let long = format!("{}.pdf", "a".repeat(300));
        assert!(sanitize_filename(&long).len() <= 255);

        let multibyte = "é".repeat(200); // 400 bytes
        let out = sanitize_filename(&multibyte);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
