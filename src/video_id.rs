//! YouTube video identifier extraction and validation.

/// Length of a canonical YouTube video identifier.
pub const ID_LEN: usize = 11;

/// URL fragments that precede a video identifier.
const MARKERS: &[&str] = &["watch?v=", "youtu.be/", "/shorts/"];

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Returns true when `candidate` is a syntactically valid video identifier.
pub fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == ID_LEN && candidate.chars().all(is_id_char)
}

/// Extracts a normalized 11-character video identifier from a raw URL or a
/// bare candidate ID.
///
/// Recognized URL shapes are `watch?v=`, `youtu.be/`, and `/shorts/` followed
/// by the identifier; trailing query-string noise is ignored. Returns `None`
/// when no pattern matches and the bare candidate is not itself a valid ID.
pub fn resolve(input: &str) -> Option<String> {
    let input = input.trim();

    for marker in MARKERS {
        if let Some(pos) = input.find(marker) {
            let candidate: String = input[pos + marker.len()..]
                .chars()
                .take_while(|c| is_id_char(*c))
                .take(ID_LEN)
                .collect();
            if candidate.len() == ID_LEN {
                return Some(candidate);
            }
        }
    }

    if is_valid_id(input) {
        return Some(input.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_watch_url() {
        assert_eq!(
            resolve("https://youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn resolves_watch_url_with_query_noise() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn resolves_short_link() {
        assert_eq!(
            resolve("https://youtu.be/dQw4w9WgXcQ?si=abc").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn resolves_shorts_url() {
        assert_eq!(
            resolve("https://www.youtube.com/shorts/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn accepts_bare_id() {
        assert_eq!(resolve("dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(resolve("a-b_c123XYZ").as_deref(), Some("a-b_c123XYZ"));
    }

    #[test]
    fn rejects_short_candidate() {
        assert_eq!(resolve("short"), None);
    }

    #[test]
    fn rejects_invalid_characters() {
        assert_eq!(resolve("dQw4w9WgXc!"), None);
        assert_eq!(resolve("dQw4w9WgXcQQ"), None);
    }

    #[test]
    fn rejects_url_with_truncated_id() {
        assert_eq!(resolve("https://youtu.be/abc"), None);
        assert_eq!(resolve("https://youtube.com/watch?v="), None);
    }

    #[test]
    fn same_id_from_all_url_shapes() {
        let expected = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(resolve("https://youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("https://youtube.com/shorts/dQw4w9WgXcQ"), expected);
    }
}
