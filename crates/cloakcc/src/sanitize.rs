//! Filename sanitization for untrusted upload names

/// Sanitize an untrusted filename so it is safe to join onto a scratch
/// directory path.
///
/// Takes the final path component (both `/` and `\` count as separators),
/// maps every byte outside `[A-Za-z0-9._-]` to `_`, and trims leading and
/// trailing dots and underscores so no relative or hidden name survives.
/// May return an empty string; callers fall back to a generated name.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_matches(['.', '_']).to_string()
}

/// Extract the extension of a filename, if it has one.
///
/// A name without a dot has no extension. The returned slice is not
/// lowercased; callers normalize for case-insensitive comparison.
pub fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_filename("main.c"), "main.c");
        assert_eq!(sanitize_filename("my-prog_2.cpp"), "my-prog_2.cpp");
    }

    #[test]
    fn test_path_traversal_stripped() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/etc/shadow"), "shadow");
        assert_eq!(sanitize_filename("..\\..\\win.ini"), "win.ini");
    }

    #[test]
    fn test_unsafe_chars_replaced() {
        assert_eq!(sanitize_filename("a b.c"), "a_b.c");
        assert_eq!(sanitize_filename("x;rm -rf.c"), "x_rm_-rf.c");
    }

    #[test]
    fn test_leading_dots_trimmed() {
        assert_eq!(sanitize_filename(".hidden.c"), "hidden.c");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a.c"), Some("c"));
        assert_eq!(extension("a.tar.gz"), Some("gz"));
        assert_eq!(extension("Makefile"), None);
        assert_eq!(extension("a.CPP"), Some("CPP"));
    }
}
