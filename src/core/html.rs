// src/core/html.rs
// Low-level HTML string scanning helpers.
// Deliberately naive but tailored to old-school timing-report markup.
// All matching is case-insensitive on ASCII tag/attribute names.

/// Fast ASCII-only lowercasing for tag/attribute matching.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Find the next complete tag block from `from` onwards, case-insensitive.
/// A block runs from the start of the opening tag to the end of the closing tag.
///
/// Example:
/// `<tr ...> ... </tr>` or `<td ...> ... </td>`
pub fn next_tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_tag);
    let close_lc = to_lower(close_tag);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    let end = open_end + end_rel + close_tag.len();
    Some((start, end))
}

/// Find the next table cell block (`<td>` or `<th>`, whichever comes first).
pub fn next_cell_block_ci(s: &str, from: usize) -> Option<(usize, usize)> {
    let td = next_tag_block_ci(s, "<td", "</td>", from);
    let th = next_tag_block_ci(s, "<th", "</th>", from);
    match (td, th) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// The `index`-th (0-based, document order) `<table>…</table>` block.
pub fn nth_table_block_ci(s: &str, index: usize) -> Option<&str> {
    let mut pos = 0usize;
    let mut seen = 0usize;
    loop {
        let (start, end) = next_tag_block_ci(s, "<table", "</table>", pos)?;
        if seen == index {
            return Some(&s[start..end]);
        }
        seen += 1;
        pos = end;
    }
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return the INNER text without the wrapping tags (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Read an attribute value out of a tag opener like
/// `<input type="checkbox" value=on>`. Tolerates single quotes, double
/// quotes and unquoted values.
pub fn attr_value_ci(opener: &str, name: &str) -> Option<String> {
    let lc = to_lower(opener);
    let needle = join!(name, "=");
    let at = lc.find(&needle)?;
    let val = &opener[at + needle.len()..];

    let (quote, start) = match val.as_bytes().first() {
        Some(b'"') => ('"', 1),
        Some(b'\'') => ('\'', 1),
        _ => ('\0', 0),
    };
    let end = if quote != '\0' {
        val[start..].find(quote).map(|e| start + e).unwrap_or(val.len())
    } else {
        val[start..]
            .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            .map(|e| start + e)
            .unwrap_or(val.len())
    };
    Some(val[start..end].to_string())
}

/// Whether a tag opener carries a bare boolean attribute (`checked`,
/// `selected`, …) either standalone or in `name="name"` form.
pub fn has_attr_ci(opener: &str, name: &str) -> bool {
    let lc = to_lower(opener);
    lc.split(|c: char| c.is_ascii_whitespace() || c == '<' || c == '>' || c == '/')
        .any(|tok| tok == name || tok.starts_with(&join!(name, "=")))
}
