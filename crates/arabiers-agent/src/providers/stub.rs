//! Scripted backends for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{GenerationResult, Prompt, RetrievedDocument};

use super::llm::LlmProvider;
use super::retriever::DocumentRetriever;

/// Retriever returning a fixed document set or a fixed failure
pub struct StubRetriever {
    name: String,
    docs: Vec<RetrievedDocument>,
    fail_with: Option<String>,
    pub calls: AtomicUsize,
}

impl StubRetriever {
    pub fn with_docs(texts: &[&str]) -> Self {
        Self {
            name: "stub-retriever".to_string(),
            docs: texts.iter().map(|t| RetrievedDocument::new(*t)).collect(),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_docs(&[])
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::empty()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentRetriever for StubRetriever {
    async fn retrieve(&self, _query: &str, _top_k: usize) -> Result<Vec<RetrievedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(Error::search(message.clone())),
            None => Ok(self.docs.clone()),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fail_with.is_none())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Which entry points the stub LLM exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoints {
    Both,
    BatchOnly,
    None,
}

/// LLM replaying scripted outputs in order; the last output repeats
pub struct StubLlm {
    outputs: Mutex<VecDeque<Result<GenerationResult>>>,
    last: Mutex<Option<GenerationResult>>,
    entry_points: EntryPoints,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    pub fn replying(outputs: &[&str]) -> Self {
        Self {
            outputs: Mutex::new(
                outputs
                    .iter()
                    .map(|o| Ok(GenerationResult::from(*o)))
                    .collect(),
            ),
            last: Mutex::new(None),
            entry_points: EntryPoints::Both,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn structured(value: serde_json::Value) -> Self {
        let stub = Self::replying(&[]);
        stub.outputs
            .lock()
            .push_back(Ok(GenerationResult::Structured(value)));
        stub
    }

    pub fn failing(message: &str) -> Self {
        let stub = Self::replying(&[]);
        stub.outputs.lock().push_back(Err(Error::llm(message)));
        stub
    }

    pub fn with_entry_points(mut self, entry_points: EntryPoints) -> Self {
        self.entry_points = entry_points;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().len()
    }

    async fn next(&self, prompt: &Prompt) -> Result<GenerationResult> {
        self.prompts.lock().push(prompt.as_str().to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.outputs.lock().pop_front();
        match next {
            Some(Ok(result)) => {
                *self.last.lock() = Some(result.clone());
                Ok(result)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .lock()
                .clone()
                .ok_or_else(|| Error::llm("no scripted output")),
        }
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn predict(&self, prompt: &Prompt) -> Result<GenerationResult> {
        match self.entry_points {
            EntryPoints::Both => self.next(prompt).await,
            _ => Err(Error::unsupported("stub-llm::predict")),
        }
    }

    async fn generate_batch(&self, prompts: &[Prompt]) -> Result<Vec<GenerationResult>> {
        if self.entry_points == EntryPoints::None {
            return Err(Error::unsupported("stub-llm::generate_batch"));
        }
        let mut results = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            results.push(self.next(prompt).await?);
        }
        Ok(results)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub-llm"
    }

    fn model(&self) -> &str {
        "stub"
    }
}
