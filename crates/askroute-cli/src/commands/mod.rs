//! CLI command implementations

pub mod ask;
pub mod chat;
pub mod ingest;
pub mod status;

use anyhow::Result;
use askroute_core::{
    Config, HttpLlmClient, OpenWeatherMap, Pipeline, PipelineOptions, Store,
};

/// Clients shared by the question-answering commands
pub(crate) struct Clients {
    pub llm: HttpLlmClient,
    pub weather: OpenWeatherMap,
}

impl Clients {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            llm: HttpLlmClient::new(config.llm.clone())?,
            weather: OpenWeatherMap::new(config.weather.clone())?,
        })
    }
}

/// Run one pipeline turn and return the generated answer, if any stage
/// yielded one
pub(crate) async fn answer_question(
    clients: &Clients,
    store: &Store,
    config: &Config,
    question: &str,
) -> Result<Option<String>> {
    let options = PipelineOptions {
        collection: config.store.collection.clone(),
        top_k: config.pipeline.top_k,
    };

    let db = store.lock();
    let pipeline = Pipeline::new(&clients.llm, &clients.llm, &clients.weather, &db, options);
    let run = pipeline.run(question).await?;

    Ok(run.answer().map(|a| a.to_string()))
}
