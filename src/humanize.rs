//! Turning property keys into display labels.

/// Convert an identifier such as `lastChildId` or `default_style` into a
/// sentence-cased label (`"Last child id"`, `"Default style"`).
pub fn humanize(key: &str) -> String {
    let trimmed = key.trim_matches(|c: char| c == '_' || c.is_whitespace());

    let mut words = String::with_capacity(trimmed.len() + 4);
    let mut prev: Option<char> = None;
    for c in trimmed.chars() {
        if c == '_' || c.is_whitespace() {
            if !words.ends_with(' ') {
                words.push(' ');
            }
        } else {
            if c.is_uppercase()
                && matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit())
            {
                words.push(' ');
            }
            words.extend(c.to_lowercase());
        }
        prev = Some(c);
    }

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
