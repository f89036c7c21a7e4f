//! Interactive chat session
//!
//! One pipeline run per turn. A failed turn prints a single inline
//! notice and the session continues; `/reset` clears the transcript and
//! re-reads the environment and configuration.

use super::{answer_question, Clients};
use anyhow::Result;
use askroute_core::{Config, Store};
use std::io::{BufRead, Write};

/// Parsed REPL input
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    Question(&'a str),
    Ingest(&'a str),
    Reset,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_directive(line: &str) -> Directive<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Directive::Empty;
    }
    if let Some(rest) = trimmed.strip_prefix('/') {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or("").trim();
        return match command {
            "quit" | "exit" => Directive::Quit,
            "reset" => Directive::Reset,
            "ingest" if !arg.is_empty() => Directive::Ingest(arg),
            _ => Directive::Unknown(trimmed),
        };
    }
    Directive::Question(trimmed)
}

pub async fn run(store: &Store, mut config: Config) -> Result<()> {
    let mut clients = Clients::from_config(&config)?;
    let mut transcript: Vec<(&'static str, String)> = Vec::new();

    println!("askroute chat - ask about the weather or your ingested PDFs.");
    println!("Directives: /ingest <path>, /reset, /quit");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match parse_directive(&line) {
            Directive::Empty => continue,
            Directive::Quit => break,
            Directive::Unknown(raw) => {
                println!("Unknown directive: {}", raw);
            }
            Directive::Reset => {
                transcript.clear();
                // Re-read .env with override so changed keys take effect
                dotenvy::dotenv_override().ok();
                config = Config::reload()?;
                clients = Clients::from_config(&config)?;
                println!("Session cleared, configuration reloaded.");
            }
            Directive::Ingest(path) => {
                let args = crate::app::IngestArgs {
                    path: path.into(),
                    collection: None,
                };
                if let Err(e) = super::ingest::run(args, store, &config).await {
                    println!("Error ingesting PDF: {:#}", e);
                }
            }
            Directive::Question(question) => {
                transcript.push(("user", question.to_string()));

                match answer_question(&clients, store, &config, question).await {
                    Ok(Some(answer)) => {
                        println!("{}", answer);
                        transcript.push(("assistant", answer));
                    }
                    Ok(None) => {
                        println!("No answer generated.");
                    }
                    Err(e) => {
                        // One notice per failed turn; the user may resend
                        println!("An error occurred: {:#}", e);
                    }
                }
            }
        }
    }

    Ok(())
}
