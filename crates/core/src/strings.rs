//! Text helpers

/// Strip the common leading indentation from a multi-line string, so that
/// indented literals can be written in place:
///
/// ```
/// use osc_common_core::strings::dedent;
///
/// let text = "
///     abc
///         easy as
///     ";
/// assert_eq!(dedent(text), "abc\n    easy as");
/// ```
///
/// Blank and whitespace-only lines are dropped. If any line with content
/// starts at column zero there is nothing to strip and the input comes back
/// unchanged. Lines are split on `\n` only.
pub fn dedent(s: &str) -> String {
    let lines: Vec<&str> = s.split('\n').collect();

    if lines
        .iter()
        .any(|line| !line.is_empty() && count_leading_whitespace(line) == 0)
    {
        return s.to_string();
    }

    let content: Vec<&str> = lines.into_iter().filter(|line| !is_blank(line)).collect();
    let Some(indent) = content
        .iter()
        .map(|line| count_leading_whitespace(line))
        .min()
    else {
        return String::new();
    };

    content
        .iter()
        .map(|line| &line[indent..])
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of leading ASCII whitespace characters in `s`.
pub fn count_leading_whitespace(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_whitespace).count()
}

fn is_blank(line: &str) -> bool {
    count_leading_whitespace(line) == line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_source_indented_string() {
        let s = "
\t\tabc
\t\t\teasy as
\t\t\t\tone two three
\t\t";
        assert_eq!(dedent(s), "abc\n\teasy as\n\t\tone two three");
    }

    #[test]
    fn test_dedent_already_dedented_string_is_unchanged() {
        let s = "abc\n\teasy as\n\t\tone two three";
        assert_eq!(dedent(s), s);
    }

    #[test]
    fn test_dedent_drops_blank_lines() {
        let s = "\n    first\n\n      \n    second\n";
        assert_eq!(dedent(s), "first\nsecond");
    }

    #[test]
    fn test_dedent_shallow_trailing_line_does_not_limit_indent() {
        let s = "\n        deep\n          deeper\n  ";
        assert_eq!(dedent(s), "deep\n  deeper");
    }

    #[test]
    fn test_dedent_all_blank() {
        assert_eq!(dedent("\n   \n\t\n"), "");
        assert_eq!(dedent(""), "");
    }

    #[test]
    fn test_count_leading_whitespace() {
        assert_eq!(count_leading_whitespace("  abc"), 2);
        assert_eq!(count_leading_whitespace("abc"), 0);
        assert_eq!(count_leading_whitespace("  x y z"), 2);
        assert_eq!(count_leading_whitespace("\t \tmixed"), 3);
        assert_eq!(count_leading_whitespace(""), 0);
    }
}
