//! LLM integration
//!
//! Traits and implementations for chat completion, structured extraction
//! (routing, city extraction) and embedding generation via an external
//! OpenAI-compatible inference service.

mod client;
mod extract;
mod traits;

pub use client::HttpLlmClient;
pub use extract::{extract_city, route_query, RouteDecision};
pub use traits::{ChatMessage, Embedder, LLMClient};
