//! String cleanup shared by every field parser.

/// Collapse every whitespace run (including non-breaking spaces) into one space and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove currency symbols, leaving a single space where they stood
pub fn strip_currency(text: &str, symbols: &[String]) -> String {
    let stripped = symbols
        .iter()
        .filter(|s| !s.is_empty())
        .fold(text.to_string(), |acc, symbol| acc.replace(symbol.as_str(), " "));
    collapse_whitespace(&stripped)
}

/// Drop spaces between digit groups and turn a comma between digits into a decimal point
pub fn normalize_decimal(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let between_digits = i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_ascii_digit()
            && chars[i + 1].is_ascii_digit();

        match c {
            ' ' if between_digits => {}
            ',' if between_digits => out.push('.'),
            _ => out.push(c),
        }
    }

    out
}

/// Full normalization pass: whitespace, currency symbols, then number separators
pub fn normalize(raw: &str, currency_symbols: &[String]) -> String {
    normalize_decimal(&strip_currency(&collapse_whitespace(raw), currency_symbols))
}

/// Parse a count only when the cleaned text is nothing but ASCII digits
pub fn parse_count(text: &str) -> Option<u32> {
    let text = collapse_whitespace(text);
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
