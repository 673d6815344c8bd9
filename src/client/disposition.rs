//! Filename extraction from `Content-Disposition` style header text.
//!
//! This is a best-effort textual match, not a header grammar parser. The
//! extended `filename*=charset''value` form and percent-encoding are not
//! decoded, and only the first `filename` token is considered.

use regex::Regex;
use std::sync::LazyLock;

/// Fallback filename when neither the response nor the caller names the file.
pub const DEFAULT_FILENAME: &str = "merged.pdf";

/// `filename`, anything up to `=`, then a quoted string or a bare token.
static FILENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename[^;=\n]*=("[^"\n]*"|'[^'\n]*'|[^;\n]*)"#)
        .expect("valid filename pattern")
});

/// Extracts the suggested filename from raw header text.
///
/// Returns `None` when no `filename` token is present or the value is empty.
pub fn extract_filename(raw: &str) -> Option<String> {
    let captures = FILENAME_REGEX.captures(raw)?;
    let value = captures
        .get(1)?
        .as_str()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Picks the filename to present for a delivered PDF.
///
/// Order: the filename the service suggested, then the requested name
/// (with `.pdf` appended when missing), then [`DEFAULT_FILENAME`].
pub fn suggested_filename(extracted: Option<&str>, requested: Option<&str>) -> String {
    if let Some(name) = extracted.filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    match requested.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) if name.to_ascii_lowercase().ends_with(".pdf") => name.to_string(),
        Some(name) => format!("{}.pdf", name),
        None => DEFAULT_FILENAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_filename_keeps_spaces() {
        let raw = "content-type: application/pdf\r\n\
                   content-disposition: attachment; filename=\"report 2024.pdf\"\r\n";
        assert_eq!(extract_filename(raw), Some("report 2024.pdf".to_string()));
    }

    #[test]
    fn test_single_quoted_filename() {
        let raw = "Content-Disposition: inline; filename='x.pdf'";
        assert_eq!(extract_filename(raw), Some("x.pdf".to_string()));
    }

    #[test]
    fn test_bare_filename_stops_at_semicolon() {
        let raw = "Content-Disposition: attachment; filename=merged.pdf; size=42";
        assert_eq!(extract_filename(raw), Some("merged.pdf".to_string()));
    }

    #[test]
    fn test_bare_filename_stops_at_line_end() {
        let raw = "content-disposition: attachment; filename=out.pdf\r\nx-other: 1\r\n";
        assert_eq!(extract_filename(raw), Some("out.pdf".to_string()));
    }

    #[test]
    fn test_whitespace_around_equals() {
        let raw = "Content-Disposition: attachment; filename = \"spaced.pdf\"";
        assert_eq!(extract_filename(raw), Some("spaced.pdf".to_string()));
    }

    #[test]
    fn test_no_filename_token() {
        assert_eq!(extract_filename("content-type: application/pdf\r\n"), None);
        assert_eq!(extract_filename(""), None);
    }

    #[test]
    fn test_case_sensitive_token() {
        assert_eq!(extract_filename("Content-Disposition: inline; FILENAME=a.pdf"), None);
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(extract_filename("Content-Disposition: inline; filename=\"\""), None);
    }

    #[test]
    fn test_suggested_filename_order() {
        assert_eq!(suggested_filename(Some("x.pdf"), Some("ignored")), "x.pdf");
        assert_eq!(suggested_filename(None, Some("handout")), "handout.pdf");
        assert_eq!(suggested_filename(None, Some("handout.PDF")), "handout.PDF");
        assert_eq!(suggested_filename(None, Some("  ")), DEFAULT_FILENAME);
        assert_eq!(suggested_filename(None, None), DEFAULT_FILENAME);
    }
}
