//! Turn output: plain reply text, JSON, and the verbose state dump on stderr.

use std::io::{self, Write};

use pantry::{ConversationState, TurnReply};

/// Indent for nested state fields.
const INDENT: &str = "  ";

/// Max chars of a transcript line in the verbose dump.
const MESSAGE_PREVIEW_LEN: usize = 80;

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Print `{"reply": ..., "state": ...}` instead of the reply text.
    pub json: bool,
    pub pretty: bool,
    /// Dump the session state to stderr after each turn.
    pub verbose: bool,
    /// Truncate the printed reply; 0 means no limit.
    pub max_reply_len: usize,
}

/// Truncates to at most `max` chars, ending in "..." when cut. UTF-8 safe.
pub fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    if max <= SUFFIX.len() {
        return s.chars().take(max).collect();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max - SUFFIX.len()).collect();
    format!("{head}{SUFFIX}")
}

/// Writes one turn to `out` (reply or JSON) and, when verbose, the state to `err`.
pub fn write_turn(
    out: &mut impl Write,
    err: &mut impl Write,
    reply: &TurnReply,
    state: &ConversationState,
    opts: &OutputOptions,
) -> io::Result<()> {
    if opts.json {
        let value = serde_json::json!({ "reply": reply, "state": state });
        let s = if opts.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        writeln!(out, "{s}")?;
    } else if opts.max_reply_len == 0 {
        writeln!(out, "{}", reply.text)?;
    } else {
        writeln!(out, "{}", truncate_display(&reply.text, opts.max_reply_len))?;
    }
    out.flush()?;

    if opts.verbose {
        writeln!(err, "{}", format_state_display(state))?;
    }
    Ok(())
}

/// Writes to the process stdout and stderr.
pub fn print_turn(
    reply: &TurnReply,
    state: &ConversationState,
    opts: &OutputOptions,
) -> io::Result<()> {
    write_turn(
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
        reply,
        state,
        opts,
    )
}

fn optional(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("-")
}

/// One field per line; transcript lines truncated.
pub fn format_state_display(state: &ConversationState) -> String {
    let p = &state.preferences;
    let mut lines = vec!["ConversationState {".to_string()];
    lines.push(format!("{INDENT}ingredients: [{}]", state.ingredients.join(", ")));
    lines.push(format!("{INDENT}diet: {}", optional(&p.diet)));
    lines.push(format!("{INDENT}allergies: [{}]", p.allergies.join(", ")));
    lines.push(format!("{INDENT}cuisine: {}", optional(&p.cuisine)));
    lines.push(format!(
        "{INDENT}prep_time: {}",
        p.prep_time.map(|m| m.to_string()).unwrap_or_else(|| "-".into())
    ));
    lines.push(format!("{INDENT}craving: {}", optional(&p.craving)));
    lines.push(format!("{INDENT}iterations: {}", state.iterations));
    lines.push(format!("{INDENT}failed_rounds: {}", state.failed_rounds));
    lines.push(format!("{INDENT}force_pause: {}", state.force_pause));
    match state.recipe_source {
        Some(source) => lines.push(format!(
            "{INDENT}recipes: {} ({source})",
            state.recipes.len()
        )),
        None => lines.push(format!("{INDENT}recipes: {}", state.recipes.len())),
    }
    lines.push(format!("{INDENT}messages:"));
    for m in &state.messages {
        lines.push(format!(
            "{INDENT}{INDENT}{}: {}",
            m.role(),
            truncate_display(&m.content().replace('\n', " "), MESSAGE_PREVIEW_LEN)
        ));
    }
    lines.push("}".to_string());
    lines.join("\n")
}
