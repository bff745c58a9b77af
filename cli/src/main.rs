//! Pantry CLI: one-shot or interactive chat with the recipe assistant.

mod display;
mod log_format;
mod logging;
mod repl;

use std::path::Path;

use clap::Parser;
use pantry::config::APP_NAME;
use pantry::{AssistantConfig, ConversationSession};
use tokio::io::BufReader;

use display::{print_turn, OutputOptions};
use repl::run_repl_loop;

#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(about = "Pantry: tell it what's in your kitchen, get recipe suggestions")]
struct Args {
    /// User message (or pass as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: user message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Interactive REPL: keep the conversation going until EOF or `quit`
    #[arg(short, long)]
    interactive: bool,

    /// Print the reply and the full session state as JSON
    #[arg(long)]
    json: bool,

    /// With --json, pretty-print
    #[arg(long)]
    pretty: bool,

    /// Print the extracted state to stderr after each turn
    #[arg(short, long)]
    verbose: bool,

    /// Model id (overrides PANTRY_MODEL and config.toml)
    #[arg(long, value_name = "ID")]
    model: Option<String>,

    /// Collection rounds before searching with whatever is known
    #[arg(long, value_name = "N")]
    max_iterations: Option<u32>,

    /// Truncate printed replies to this many chars; 0 means no limit
    #[arg(long, value_name = "N", env = "PANTRY_MAX_REPLY_LEN", default_value_t = 0)]
    max_reply_len: usize,
}

impl Args {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| (!self.rest.is_empty()).then(|| self.rest.join(" ")))
            .filter(|m| !m.trim().is_empty())
    }

    fn apply_overrides(&self, config: &mut AssistantConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(n) = self.max_iterations {
            config.iteration_ceiling = n.max(1);
        }
    }

    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            pretty: self.pretty,
            verbose: self.verbose,
            max_reply_len: self.max_reply_len,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply(APP_NAME, None::<&Path>).ok();
    logging::init()?;

    let args = Args::parse();
    let message = args.message();
    if !args.interactive && message.is_none() {
        eprintln!("pantry: provide a message via -m/--message or positional args, or use -i");
        std::process::exit(1);
    }

    let mut config = AssistantConfig::load();
    args.apply_overrides(&mut config);
    tracing::info!(?config, "starting");

    let mut session = match ConversationSession::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("pantry: {e}");
            std::process::exit(1);
        }
    };
    let opts = args.output_options();

    if let Some(msg) = message {
        let reply = session.handle_user_message(&msg).await;
        print_turn(&reply, session.state(), &opts)?;
    }

    if args.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        run_repl_loop(
            &mut session,
            stdin,
            &mut std::io::stdout(),
            &mut std::io::stderr(),
            &opts,
        )
        .await?;
    }
    Ok(())
}
