//! Shared mocks for integration tests
#![allow(dead_code)]

use askroute_core::error::{AskRouteError, Result};
use askroute_core::llm::{ChatMessage, Embedder, LLMClient};
use askroute_core::weather::WeatherProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A canned reply for the scripted LLM
pub enum Reply {
    Text(String),
    Fail(String),
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }

    pub fn fail(s: &str) -> Self {
        Reply::Fail(s.to_string())
    }
}

/// LLM client returning scripted replies in order, recording every call
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Reply>>,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Messages of the `n`th chat call
    pub fn call_messages(&self, n: usize) -> Vec<ChatMessage> {
        self.calls.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl LLMClient for ScriptedLlm {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.lock().unwrap().push(messages);
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(msg)) => Err(AskRouteError::Llm(msg)),
            None => Err(AskRouteError::Llm("no scripted reply left".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Deterministic pseudo-random unit-free vector for a text
pub fn vector_for(text: &str, dims: usize) -> Vec<f32> {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    for b in text.bytes() {
        state ^= b as u64;
        state = state.wrapping_mul(0x0100_0000_01b3);
    }

    let mut out = Vec::with_capacity(dims);
    for _ in 0..dims {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let unit = (state >> 33) as f32 / (1u64 << 31) as f32;
        out.push(unit - 0.5);
    }
    out
}

/// Embedder producing deterministic vectors, with per-batch accounting
/// and an optional scripted failure
pub struct MockEmbedder {
    pub dims: usize,
    pub batch_sizes: Mutex<Vec<usize>>,
    pub embed_calls: AtomicUsize,
    /// Fail the nth (1-based) embed_batch call
    pub fail_on_batch: Option<usize>,
}

impl MockEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            batch_sizes: Mutex::new(Vec::new()),
            embed_calls: AtomicUsize::new(0),
            fail_on_batch: None,
        }
    }

    pub fn failing_on_batch(dims: usize, batch: usize) -> Self {
        Self {
            fail_on_batch: Some(batch),
            ..Self::new(dims)
        }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vector_for(text, self.dims))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let batch_number = {
            let mut sizes = self.batch_sizes.lock().unwrap();
            sizes.push(texts.len());
            sizes.len()
        };

        if self.fail_on_batch == Some(batch_number) {
            return Err(AskRouteError::ExternalService(
                "embedding service returned 429".to_string(),
            ));
        }

        Ok(texts.iter().map(|t| vector_for(t, self.dims)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }
}

/// Weather provider returning a fixed report or a scripted failure
pub struct MockWeather {
    pub report: Option<String>,
    pub calls: AtomicUsize,
}

impl MockWeather {
    pub fn reporting(report: &str) -> Self {
        Self {
            report: Some(report.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            report: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for MockWeather {
    async fn current_weather(&self, city: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.report {
            Some(report) => Ok(report.clone()),
            None => Err(AskRouteError::ExternalService(format!(
                "weather lookup failed for {}",
                city
            ))),
        }
    }
}

/// Rate limiter counting how often it is consulted
pub struct CountingLimiter {
    pub acquires: AtomicUsize,
}

impl CountingLimiter {
    pub fn new() -> Self {
        Self {
            acquires: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl askroute_core::RateLimiter for CountingLimiter {
    async fn acquire(&self) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
    }
}
