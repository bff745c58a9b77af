//! Isolating the structured part of a model reply: code fences and balanced delimiters.

/// Strips a surrounding triple-backtick block, dropping a leading language tag
/// (e.g. "json"). Returns the trimmed input unchanged when there is no fence.
///
/// An unterminated fence yields everything after the opening line.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[open + 3..];
    let body_start = language_tag_len(after);
    let body = &after[body_start..];
    let inner = match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    };
    let inner = inner.trim();
    // A fence around prose while JSON sits outside it: keep the whole reply.
    if inner.contains(['{', '[']) || !trimmed.contains(['{', '[']) {
        inner
    } else {
        trimmed
    }
}

/// Length of an info string such as `json` or `JSON5` right after an opening fence.
fn language_tag_len(after_fence: &str) -> usize {
    let tag_end = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_fence.len());
    match after_fence[tag_end..].chars().next() {
        Some('\n') | Some('\r') | None => tag_end,
        _ => 0,
    }
}

/// Locates the first JSON-like object or array by balanced-delimiter scanning.
///
/// Starts at whichever of `{` / `[` appears first and ends where its depth returns to
/// zero; delimiters inside double-quoted strings are ignored. When the value never
/// closes (truncated output) the rest of the text is returned so repair can try.
pub fn find_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let open = text[start..].chars().next()?;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    Some(&text[start..])
}
