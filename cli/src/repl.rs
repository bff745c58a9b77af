//! Interactive REPL: read a line, run one turn, print the reply, repeat until EOF or quit.

use std::io::{self, Write};

use pantry::ConversationSession;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::display::{write_turn, OutputOptions};

pub const GREETING: &str = "Hi! Tell me what ingredients you have (and any diet, allergies, \
cuisine, time limit or cravings) and I'll suggest recipes.";

const RESET_NOTICE: &str = "Starting over. What ingredients do you have?";

/// Runs the loop on `input`, writing replies to `out` and verbose dumps to `err`.
///
/// Exits on EOF or `quit`/`exit`/`/quit`. `/reset` starts a new conversation.
pub async fn run_repl_loop<R>(
    session: &mut ConversationSession,
    input: R,
    out: &mut impl Write,
    err: &mut impl Write,
    opts: &OutputOptions,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    if !opts.json {
        writeln!(out, "{GREETING}")?;
    }

    loop {
        if !opts.json {
            write!(out, "> ")?;
            out.flush()?;
        }

        let line = match lines.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        if is_reset_command(&line) {
            session.reset();
            tracing::info!("session reset");
            if !opts.json {
                writeln!(out, "{RESET_NOTICE}")?;
            }
            continue;
        }

        let reply = session.handle_user_message(&line).await;
        write_turn(out, err, &reply, session.state(), opts)?;
    }

    if !opts.json {
        writeln!(out, "Bye.")?;
    }
    Ok(())
}

fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit" | "/quit")
}

fn is_reset_command(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("/reset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pantry::prompts::CLARIFYING_QUESTION;
    use pantry::{LlmRecipeWriter, LoopConfig, MockLlm, RecipeFinder};

    fn session(replies: &[&str]) -> (ConversationSession, Arc<MockLlm>) {
        let llm = Arc::new(MockLlm::with_texts(replies.iter().copied()));
        let writer = Arc::new(MockLlm::with_text(
            r#"[{"title": "Cheese omelette", "instructions": ["Whisk", "Fry"]}]"#,
        ));
        let finder = RecipeFinder::new().with_generative(Arc::new(LlmRecipeWriter::new(writer)));
        let s = ConversationSession::with_collaborators(llm.clone(), finder, LoopConfig::default())
            .unwrap();
        (s, llm)
    }

    #[test]
    fn is_quit_command_matches_expected_tokens() {
        assert!(is_quit_command("quit"));
        assert!(is_quit_command(" EXIT "));
        assert!(is_quit_command("/quit"));
        assert!(!is_quit_command("quiche"));
    }

    #[test]
    fn reset_command_is_case_insensitive() {
        assert!(is_reset_command("/RESET "));
        assert!(!is_reset_command("reset my pantry"));
    }

    #[tokio::test]
    async fn repl_pauses_then_suggests_recipes() {
        let (mut s, llm) = session(&[
            r#"{"ingredients": []}"#,
            r#"{"ingredients": ["eggs", "cheese"]}"#,
        ]);
        let input: &[u8] = b"hello\n\nI have eggs and cheese\nquit\nnever read\n";
        let (mut out, mut err) = (Vec::new(), Vec::new());

        run_repl_loop(&mut s, input, &mut out, &mut err, &OutputOptions::default())
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(GREETING));
        assert!(text.contains(CLARIFYING_QUESTION));
        assert!(text.contains("- Ingredients: eggs, cheese"));
        assert!(text.contains("## Cheese omelette"));
        assert!(text.trim_end().ends_with("Bye."));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn reset_clears_the_session() {
        let (mut s, _) = session(&[r#"{"ingredients": ["rice"]}"#]);
        let input: &[u8] = b"rice\n/reset\n";
        let (mut out, mut err) = (Vec::new(), Vec::new());

        run_repl_loop(&mut s, input, &mut out, &mut err, &OutputOptions::default())
            .await
            .unwrap();

        assert!(String::from_utf8(out).unwrap().contains(RESET_NOTICE));
        assert!(s.state().messages.is_empty());
        assert!(s.state().ingredients.is_empty());
    }

    #[tokio::test]
    async fn json_mode_prints_one_object_per_turn() {
        let (mut s, _) = session(&[r#"{"ingredients": ["rice"]}"#]);
        let input: &[u8] = b"rice\nexit\n";
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let opts = OutputOptions {
            json: true,
            ..Default::default()
        };

        run_repl_loop(&mut s, input, &mut out, &mut err, &opts)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["state"]["ingredients"][0], "rice");
    }
}
