// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop embedded CR/LF characters, then trim. Raw run cells on the
/// timing report carry stray line breaks inside the time text.
pub fn strip_line_breaks(s: &str) -> String {
    let out: String = s.chars().filter(|&c| c != '\r' && c != '\n').collect();
    out.trim().to_string()
}
