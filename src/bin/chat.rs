//! Terminal client for a running Persona Chat server
//!
//! Reads lines from stdin. Plain lines are chat messages; lines starting
//! with `/` are commands (see `/help`).

use persona_chat::client::HttpGatewayClient;
use persona_chat::persona::{preset, PRESETS};
use persona_chat::runtime::{HttpRuntime, TurnOutcome};
use persona_chat::state_machine::{ChatContext, TransitionError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Generous enough to outlast the server's provider timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

const HELP: &str = "\
Commands:
  /retry            resend the last failed message
  /dismiss          clear the error without retrying
  /new              start a new chat (keeps the persona)
  /prompt <text>    set the system prompt
  /name <name>      set the bot's name (blank clears it)
  /age <age>        set the bot's age (blank clears it)
  /personas         list suggested personas
  /preset <n>       adopt suggested persona n
  /quit             exit";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Send(&'a str),
    Retry,
    Dismiss,
    New,
    Prompt(&'a str),
    Name(&'a str),
    Age(&'a str),
    Personas,
    Preset(usize),
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line);
    };
    let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    let arg = arg.trim();
    match cmd {
        "retry" => Command::Retry,
        "dismiss" => Command::Dismiss,
        "new" => Command::New,
        "prompt" => Command::Prompt(arg),
        "name" => Command::Name(arg),
        "age" => Command::Age(arg),
        "personas" => Command::Personas,
        "preset" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Preset(n - 1),
            _ => Command::Unknown(line),
        },
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line),
    }
}

fn non_blank(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn report(result: Result<TurnOutcome, TransitionError>) {
    match result {
        Ok(TurnOutcome::Committed { reply }) => println!("bot> {}", reply.content),
        Ok(TurnOutcome::RolledBack { failed, reason, .. }) => {
            eprintln!("error: {reason}");
            eprintln!("  \"{}\" was not sent. /retry to resend it.", failed.content);
        }
        Ok(TurnOutcome::Ignored) => {}
        Err(e) => eprintln!("error: {e}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persona_chat=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let server = std::env::var("PERSONA_CHAT_URL").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
    let client = HttpGatewayClient::new(&server, CLIENT_TIMEOUT)?;
    let runtime = HttpRuntime::new(ChatContext::new(uuid::Uuid::new_v4().to_string()), client);

    println!("Connected to {server}. Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse(line.trim()) {
            Command::Send(text) => report(runtime.send(text).await),
            Command::Retry => report(runtime.retry().await),
            Command::Dismiss => {
                if let Err(e) = runtime.dismiss_error() {
                    eprintln!("error: {e}");
                }
            }
            Command::New => match runtime.reset() {
                Ok(()) => println!("Started a new chat."),
                Err(e) => eprintln!("error: {e}"),
            },
            Command::Prompt(text) => {
                runtime.set_system_prompt(text);
                println!("System prompt updated.");
            }
            Command::Name(name) => {
                let age = runtime.snapshot().context().age.clone();
                runtime.set_persona(non_blank(name), age);
            }
            Command::Age(age) => {
                let name = runtime.snapshot().context().name.clone();
                runtime.set_persona(name, non_blank(age));
            }
            Command::Personas => {
                for (i, p) in PRESETS.iter().enumerate() {
                    println!("  {}. {}", i + 1, p.label);
                }
            }
            Command::Preset(index) => match preset(index) {
                Some(p) => {
                    runtime.apply_preset(p, &mut rand::thread_rng());
                    let context = runtime.snapshot().context().clone();
                    println!(
                        "Now chatting with {} ({}): {}",
                        context.name.unwrap_or_default(),
                        context.age.unwrap_or_default(),
                        p.label
                    );
                }
                None => eprintln!("No persona {}. Try /personas.", index + 1),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(line) => eprintln!("Unknown command: {line}. Try /help."),
        }
    }

    Ok(())
}
