//! API utility functions
//!
//! Pure, stateless helper functions for HTTP response assembly, extracted
//! from services.rs to enable unit testing.

/// Maximum character length of a download filename stem.
const MAX_FILENAME_LEN: usize = 120;

/// Sanitizes a video title into a safe `Content-Disposition` filename stem.
///
/// Keeps printable ASCII only (header values must be ASCII), replaces
/// path/shell-hostile characters, collapses whitespace, and caps the length.
/// Falls back to `"video"` when nothing survives.
pub fn sanitize_filename(title: &str) -> String {
    let mut cleaned = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => cleaned.push('_'),
            c if c.is_whitespace() => cleaned.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => cleaned.push(c),
            _ => {}
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(MAX_FILENAME_LEN).collect();
    let trimmed = capped.trim().trim_matches('.');

    if trimmed.is_empty() {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Content type for a raw (untranscoded) stream in the given container.
pub fn content_type_for(container: &str, has_video: bool) -> &'static str {
    match (container, has_video) {
        ("mp4", true) => "video/mp4",
        ("webm", true) => "video/webm",
        ("3gp", true) => "video/3gpp",
        ("mp4" | "m4a", false) => "audio/mp4",
        ("webm", false) => "audio/webm",
        ("mp3", false) => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Truncates a string to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((index, _)) => input[..index].to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_hostile_characters() {
        assert_eq!(
            sanitize_filename("My Video: The \"Best\" <Part 1/2>"),
            "My Video_ The _Best_ _Part 1_2_"
        );
    }

    #[test]
    fn test_sanitize_drops_non_ascii_and_control() {
        assert_eq!(sanitize_filename("Caf\u{e9} \u{1F600} mix\ntape"), "Caf mix tape");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("  too   many\t spaces  "), "too many spaces");
    }

    #[test]
    fn test_sanitize_falls_back_when_empty() {
        assert_eq!(sanitize_filename(""), "video");
        assert_eq!(sanitize_filename("\u{4e2d}\u{6587}"), "video");
        assert_eq!(sanitize_filename("..."), "video");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_filename(&long).len(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_content_type_lookup() {
        assert_eq!(content_type_for("mp4", true), "video/mp4");
        assert_eq!(content_type_for("webm", true), "video/webm");
        assert_eq!(content_type_for("webm", false), "audio/webm");
        assert_eq!(content_type_for("m4a", false), "audio/mp4");
        assert_eq!(content_type_for("flv", true), "application/octet-stream");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte characters are counted as single chars.
        assert_eq!(truncate_chars("\u{e9}\u{e9}\u{e9}\u{e9}", 2), "\u{e9}\u{e9}");
    }
}
