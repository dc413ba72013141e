const MAX_LOG_LENGTH: usize = 4_000;

/// Shorten model output before it goes into a log line. Cuts on char
/// boundaries, so accented text never splits mid-codepoint.
pub fn truncate_for_log(text: &str) -> String {
    truncate_chars(text, MAX_LOG_LENGTH)
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let dropped = text[cut..].chars().count();
            format!("{}... [truncated {} chars]", &text[..cut], dropped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate_chars("hola", 10), "hola");
    }

    #[test]
    fn test_cut_respects_multibyte_chars() {
        let result = truncate_chars("señal económica", 4);
        assert_eq!(result, "seña... [truncated 11 chars]");
    }

    #[test]
    fn test_exact_length_not_truncated() {
        assert_eq!(truncate_chars("abcd", 4), "abcd");
    }
}
