//! Routing/generation pipeline
//!
//! An explicit finite-state machine per query:
//! `Start -> Routed -> ContextGathered -> Answered`. The router picks
//! exactly one context-fetch path, the gathered context feeds the
//! generator, and the run yields an ordered sequence of stage events the
//! chat boundary consumes. No cycles, no re-routing, no retry: a stage
//! failure aborts the run with a single pipeline-level error.

mod retrieve;

pub use retrieve::{retrieve, RetrievedContext, NO_DOCUMENTS_SENTINEL};

use crate::db::Database;
use crate::error::{AskRouteError, Result};
use crate::llm::{extract_city, route_query, ChatMessage, Embedder, LLMClient, RouteDecision};
use crate::weather::WeatherProvider;

/// Pipeline stages, in order. Each stage has exactly one successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Routed,
    ContextGathered,
    Answered,
}

impl Stage {
    /// Transition table. `Answered` is terminal.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Routed),
            Stage::Routed => Some(Stage::ContextGathered),
            Stage::ContextGathered => Some(Stage::Answered),
            Stage::Answered => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Routed => "routed",
            Stage::ContextGathered => "context_gathered",
            Stage::Answered => "answered",
        }
    }
}

/// Mutable record carried across the stages of one run
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub question: String,
    pub route: Option<RouteDecision>,
    pub context: Option<String>,
    pub answer: Option<String>,
}

/// Partial output emitted by a stage, keyed by stage name
#[derive(Debug, Clone)]
pub struct StageEvent {
    pub stage: &'static str,
    pub key: &'static str,
    pub value: String,
}

/// Completed run: terminal state plus the ordered event sequence
#[derive(Debug)]
pub struct PipelineRun {
    pub state: PipelineState,
    pub events: Vec<StageEvent>,
}

impl PipelineRun {
    /// The generator's answer, if any stage yielded one
    pub fn answer(&self) -> Option<&str> {
        self.events
            .iter()
            .find(|e| e.key == "answer")
            .map(|e| e.value.as_str())
    }
}

/// Pipeline options
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Collection queried on the documents route
    pub collection: String,
    /// Nearest chunks retrieved per query
    pub top_k: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            collection: "docs".to_string(),
            top_k: 10,
        }
    }
}

/// One query's pipeline over the shared clients and store
pub struct Pipeline<'a> {
    llm: &'a dyn LLMClient,
    embedder: &'a dyn Embedder,
    weather: &'a dyn WeatherProvider,
    db: &'a Database,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        llm: &'a dyn LLMClient,
        embedder: &'a dyn Embedder,
        weather: &'a dyn WeatherProvider,
        db: &'a Database,
        options: PipelineOptions,
    ) -> Self {
        Self {
            llm,
            embedder,
            weather,
            db,
            options,
        }
    }

    /// Run the pipeline to its terminal state.
    ///
    /// Stage errors are not recovered here; the single exception is a
    /// weather-provider failure, which the weather stage converts into a
    /// diagnostic context blob so generation can still produce a
    /// could-not-fetch answer.
    pub async fn run(&self, question: &str) -> Result<PipelineRun> {
        let mut state = PipelineState {
            question: question.to_string(),
            ..Default::default()
        };
        let mut events = Vec::new();
        let mut stage = Stage::Start;

        // Start -> Routed
        tracing::info!(question, "routing query");
        let route = route_query(self.llm, question).await?;
        state.route = Some(route);
        events.push(StageEvent {
            stage: "router",
            key: "route",
            value: route.as_str().to_string(),
        });
        stage = advance(stage)?;

        // Routed -> ContextGathered, via exactly one fetch path
        let (source_stage, context) = match route {
            RouteDecision::Weather => ("weather", self.fetch_weather(question).await?),
            RouteDecision::Documents => ("retriever", self.fetch_documents(question).await?),
        };
        state.context = Some(context.clone());
        events.push(StageEvent {
            stage: source_stage,
            key: "context",
            value: context,
        });
        stage = advance(stage)?;

        // ContextGathered -> Answered
        let answer = self.generate(&state).await?;
        state.answer = Some(answer.clone());
        events.push(StageEvent {
            stage: "generator",
            key: "answer",
            value: answer,
        });
        stage = advance(stage)?;

        debug_assert_eq!(stage, Stage::Answered);
        Ok(PipelineRun { state, events })
    }

    /// Weather fetch stage.
    ///
    /// City extraction failures propagate; a provider failure becomes a
    /// diagnostic context blob and the stage succeeds.
    async fn fetch_weather(&self, question: &str) -> Result<String> {
        let city = extract_city(self.llm, question).await?;
        tracing::info!(city = %city, "fetching weather");

        match self.weather.current_weather(&city).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "weather fetch failed, continuing with diagnostic context");
                Ok(format!("Error fetching weather for {}: {}", city, e))
            }
        }
    }

    /// Document retrieval stage. Store errors propagate; zero matches
    /// become the no-documents sentinel.
    async fn fetch_documents(&self, question: &str) -> Result<String> {
        tracing::info!("retrieving documents");
        let retrieved = retrieve(
            self.db,
            self.embedder,
            &self.options.collection,
            question,
            self.options.top_k,
        )
        .await?;
        Ok(retrieved.into_blob())
    }

    /// Answer generation stage. The context-only constraint is advisory,
    /// enforced solely by the model's compliance.
    async fn generate(&self, state: &PipelineState) -> Result<String> {
        tracing::info!("generating answer");
        let context = state.context.as_deref().unwrap_or_default();

        let messages = vec![
            ChatMessage::system(
                "You are a helpful assistant. Answer the user's question based ONLY on \
                 the following context.",
            ),
            ChatMessage::user(format!(
                "Context:\n{}\n\nQuestion:\n{}",
                context, state.question
            )),
        ];

        self.llm.chat_completion(messages).await
    }
}

/// Take the single legal transition out of `stage`
fn advance(stage: Stage) -> Result<Stage> {
    stage.next().ok_or_else(|| {
        AskRouteError::Parse(format!(
            "pipeline already terminal at stage {}",
            stage.name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table_is_linear() {
        assert_eq!(Stage::Start.next(), Some(Stage::Routed));
        assert_eq!(Stage::Routed.next(), Some(Stage::ContextGathered));
        assert_eq!(Stage::ContextGathered.next(), Some(Stage::Answered));
        assert_eq!(Stage::Answered.next(), None);
    }

    #[test]
    fn test_advance_rejects_terminal() {
        assert!(advance(Stage::Answered).is_err());
    }
}
