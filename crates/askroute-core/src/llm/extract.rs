//! Structured extraction over the chat completion endpoint
//!
//! The router and the city extractor both ask the model for a single
//! JSON object and decode it with an explicit validation step. A label
//! outside the closed route set and a blank city are named errors, not
//! values that flow onward.

use crate::error::{AskRouteError, Result};
use crate::llm::{ChatMessage, LLMClient};
use serde::Deserialize;

/// Which context-fetch path a query takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Weather,
    Documents,
}

impl RouteDecision {
    /// Decode a classifier label. Matching is a case-insensitive exact
    /// match over the known label set; anything else is a routing error.
    pub fn parse_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "weather" => Ok(RouteDecision::Weather),
            "rag" | "documents" => Ok(RouteDecision::Documents),
            _ => Err(AskRouteError::Routing(label.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDecision::Weather => "weather",
            RouteDecision::Documents => "rag",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouteExtraction {
    datasource: String,
}

#[derive(Debug, Deserialize)]
struct CityExtraction {
    #[serde(default)]
    city: Option<String>,
}

/// Classify a query into exactly one route
pub async fn route_query(client: &dyn LLMClient, question: &str) -> Result<RouteDecision> {
    let messages = vec![
        ChatMessage::system(
            "You are a query router. Given a user question, choose the datasource to \
             route it to. Use \"weather\" for current temperature or forecast \
             questions. Use \"rag\" for questions about ingested documents. \
             Respond ONLY with a JSON object: {\"datasource\": \"weather\"} or \
             {\"datasource\": \"rag\"}.",
        ),
        ChatMessage::user(question.to_string()),
    ];

    let response = client.chat_completion(messages).await?;
    let raw = extract_json_object(&response)
        .ok_or_else(|| AskRouteError::Routing(response.clone()))?;

    let extraction: RouteExtraction = serde_json::from_str(raw)
        .map_err(|e| AskRouteError::Llm(format!("Failed to parse route JSON: {}", e)))?;

    RouteDecision::parse_label(&extraction.datasource)
}

/// Extract the city named in a query
pub async fn extract_city(client: &dyn LLMClient, question: &str) -> Result<String> {
    let messages = vec![
        ChatMessage::system(
            "You extract the city a weather question is about. Respond ONLY with a \
             JSON object: {\"city\": \"<name>\"}. If the question names no city, \
             respond with {\"city\": null}.",
        ),
        ChatMessage::user(question.to_string()),
    ];

    let response = client.chat_completion(messages).await?;
    let raw = extract_json_object(&response)
        .ok_or_else(|| AskRouteError::Llm(format!("No JSON in extractor response: {}", response)))?;

    let extraction: CityExtraction = serde_json::from_str(raw)
        .map_err(|e| AskRouteError::Llm(format!("Failed to parse city JSON: {}", e)))?;

    match extraction.city {
        Some(city) if !city.trim().is_empty() => Ok(city.trim().to_string()),
        _ => Err(AskRouteError::NoCityFound(question.to_string())),
    }
}

/// Extract the first JSON object from a completion, tolerating markdown
/// fences and surrounding prose
fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}
