/// String helpers shared by the listing filters and autocomplete

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading house-number tokens: "123 ", "12B ", "10-12 "
static STREET_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+[A-Za-z]?(?:-\d+[A-Za-z]?)?\s+)+").expect("street number pattern")
});

/// Escape character used in every LIKE pattern built here
pub const LIKE_ESCAPE: char = '\\';

/// Strip leading house numbers from a street address.
/// "123 Main St" -> "Main St". An address made only of numbers is returned trimmed.
pub fn strip_street_number(address: &str) -> String {
    let stripped = STREET_NUMBER.replace(address, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        address.trim().to_string()
    } else {
        stripped.to_string()
    }
}

/// Build a `%value%` LIKE pattern with `%`, `_` and the escape char escaped.
/// Use with `LIKE ? ESCAPE '\'`.
pub fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Parse a boolean query flag. Anything else is not a well-formed flag.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
