/// Returns at most the first `limit` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Upper-cases the first letter of every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Text up to (not including) the first `.`, `!` or `?`, trimmed.
pub fn first_sentence(text: &str) -> &str {
    let end = text.find(['.', '!', '?']).unwrap_or(text.len());
    text[..end].trim()
}
