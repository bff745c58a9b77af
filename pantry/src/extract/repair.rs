//! Best-effort fix-ups for almost-JSON produced by small models.
//!
//! Handles single-quoted strings, bare object keys, trailing commas, Python-style
//! literals and values cut off mid-way. Output is not guaranteed to parse.

use std::sync::OnceLock;

use regex::Regex;

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("valid regex"))
}

fn python_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(None|True|False)\b").expect("valid regex"))
}

/// Rewrites `input` into something `serde_json` has a better chance with.
pub fn repair_json(input: &str) -> String {
    let normalized: String = input
        .chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            c => c,
        })
        .collect();
    let requoted = requote(&normalized);
    let no_trailing = trailing_comma().replace_all(&requoted, "$1");
    python_literal()
        .replace_all(&no_trailing, |caps: &regex::Captures<'_>| match &caps[1] {
            "None" => "null",
            "True" => "true",
            _ => "false",
        })
        .into_owned()
}

/// Single pass over the text outside double-quoted strings: converts single-quoted
/// strings, quotes bare keys and closes whatever was left open at the end.
fn requote(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut open: Vec<char> = Vec::new();
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            '\'' => {
                i = copy_single_quoted(&chars, i + 1, &mut out);
            }
            '{' | '[' => {
                open.push(if c == '{' { '}' } else { ']' });
                out.push(c);
                i += 1;
            }
            '}' | ']' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
                out.push(c);
                i += 1;
            }
            c if (c.is_ascii_alphabetic() || c == '_') && after_key_boundary(&out) => {
                let end = chars[i..]
                    .iter()
                    .position(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_'))
                    .map_or(chars.len(), |p| i + p);
                let ident: String = chars[i..end].iter().collect();
                let next = chars[end..].iter().find(|ch| !ch.is_whitespace());
                if next == Some(&':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    if in_string {
        out.push('"');
    }
    if !open.is_empty() {
        let kept = out.trim_end().trim_end_matches(',').len();
        out.truncate(kept);
        if out.ends_with(':') {
            out.push_str("null");
        }
        while let Some(closer) = open.pop() {
            out.push(closer);
        }
    }
    out
}

/// True when the last significant emitted char means an object key may follow.
fn after_key_boundary(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{') | Some(','))
}

/// Copies a single-quoted string starting after its opening quote as a double-quoted one.
/// A quote only closes the string when followed by a structural char, so apostrophes
/// inside words survive. Returns the index after the closing quote.
fn copy_single_quoted(chars: &[char], mut i: usize, out: &mut String) -> usize {
    out.push('"');
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                out.push(c);
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            }
            '\'' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if matches!(next, None | Some(',') | Some(':') | Some('}') | Some(']')) {
                    out.push('"');
                    return i + 1;
                }
                out.push('\'');
            }
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
        i += 1;
    }
    out.push('"');
    i
}
