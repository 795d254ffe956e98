use once_cell::sync::Lazy;
use regex::Regex;

// Maximal runs of unquoted non-space characters and double-quoted spans,
// concatenated. Quotes stay part of the token; escape sequences inside quotes
// are not interpreted. Known limitation, kept for compatibility.
static ARG_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:[^\s"]+|"[^"]*")+"#).expect("argument tokenizer regex"));

/// Split a raw argument string into an argument vector.
pub fn split_args(raw: &str) -> Vec<String> {
    ARG_TOKEN
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_outside_quotes() {
        assert_eq!(
            split_args(r#"foo "bar baz" qux"#),
            vec!["foo", "\"bar baz\"", "qux"]
        );
    }

    #[test]
    fn empty_input_yields_no_args() {
        assert_eq!(split_args(""), Vec::<String>::new());
        assert_eq!(split_args("   "), Vec::<String>::new());
    }

    #[test]
    fn quoted_span_glues_to_adjacent_text() {
        assert_eq!(split_args(r#"ab"c d"e"#), vec![r#"ab"c d"e"#]);
    }

    #[test]
    fn escapes_are_not_interpreted() {
        // The backslash does not protect the quote; the span ends at it.
        assert_eq!(split_args(r#""a\" b"#), vec![r#""a\""#, "b"]);
    }

    #[test]
    fn runs_of_whitespace_collapse() {
        assert_eq!(split_args("--flag   value"), vec!["--flag", "value"]);
    }
}
