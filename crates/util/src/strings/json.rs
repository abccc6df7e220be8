/// Escapes text for embedding in a JSON string (or a YAML double-quoted
/// scalar, which accepts the same escapes).
///
/// Escapes control characters (`U+0000..=U+001F`), the double quote and the
/// backslash. Everything else is emitted as is.
///
/// # Examples
///
/// ```
/// use mapgraph_util::strings::escape_json_string;
///
/// assert_eq!(escape_json_string("hello"), "hello");
/// assert_eq!(escape_json_string("say \"hi\""), "say \\\"hi\\\"");
/// assert_eq!(escape_json_string("line1\nline2"), "line1\\nline2");
/// ```
pub fn escape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for (i, ch) in s.char_indices() {
        let short = match ch {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\u{0008}' => Some("\\b"),
            '\t' => Some("\\t"),
            '\n' => Some("\\n"),
            '\u{000C}' => Some("\\f"),
            '\r' => Some("\\r"),
            _ => None,
        };
        if short.is_none() && ch >= '\u{0020}' {
            continue;
        }

        result.push_str(&s[last..i]);
        match short {
            Some(esc) => result.push_str(esc),
            None => result.push_str(&format!("\\u{:04x}", ch as u32)),
        }
        last = i + ch.len_utf8();
    }

    result.push_str(&s[last..]);
    result
}
