//! One-shot ask command

use super::{answer_question, Clients};
use crate::app::AskArgs;
use anyhow::Result;
use askroute_core::{Config, Store};

pub async fn run(args: AskArgs, store: &Store, config: &Config) -> Result<()> {
    let question = args.question.join(" ");
    let clients = Clients::from_config(config)?;

    match answer_question(&clients, store, config, &question).await? {
        Some(answer) => println!("{}", answer),
        None => println!("No answer generated."),
    }

    Ok(())
}
