// src/testing.rs
//! In-process fakes for the language-model and scraping capabilities.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::llm::{CompletionRequest, LanguageModel, LlmError};
use crate::search::{ScrapeError, Scraper};

#[derive(Debug, Clone)]
enum Reply {
    Content(Option<String>),
    Unauthorized,
}

/// Language model that answers every prompt from a fixed script.
///
/// Routed replies are matched by a substring of the system prompt, so one
/// model can serve several generators in a single pipeline.
pub struct ScriptedModel {
    default: Reply,
    routes: Vec<(String, Reply)>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    fn with_default(default: Reply) -> Self {
        Self {
            default,
            routes: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_default(Reply::Content(None))
    }

    pub fn raw(content: &str) -> Self {
        Self::with_default(Reply::Content(Some(content.to_string())))
    }

    pub fn json(value: Value) -> Self {
        Self::raw(&value.to_string())
    }

    pub fn unauthorized() -> Self {
        Self::with_default(Reply::Unauthorized)
    }

    /// Answer with `value` whenever the system prompt contains `marker`.
    pub fn route(mut self, marker: &str, value: Value) -> Self {
        self.routes
            .push((marker.to_string(), Reply::Content(Some(value.to_string()))));
        self
    }

    pub fn route_raw(mut self, marker: &str, content: &str) -> Self {
        self.routes
            .push((marker.to_string(), Reply::Content(Some(content.to_string()))));
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, LlmError> {
        let reply = self
            .routes
            .iter()
            .find(|(marker, _)| request.system.contains(marker.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.clone());
        self.requests.lock().unwrap().push(request);

        match reply {
            Reply::Content(content) => Ok(content),
            Reply::Unauthorized => Err(LlmError::Unauthorized { status: 401 }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ScriptedRun {
    Items(Vec<Value>),
    Fail,
    Unauthorized,
    /// Never completes within a test's ceiling.
    Hang,
}

/// Scraper replaying scripted runs in order, then returning nothing.
#[derive(Default)]
pub struct FakeScraper {
    shared: Mutex<VecDeque<ScriptedRun>>,
    per_actor: Mutex<HashMap<String, VecDeque<ScriptedRun>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeScraper {
    pub fn new(runs: Vec<ScriptedRun>) -> Self {
        Self {
            shared: Mutex::new(runs.into()),
            ..Self::default()
        }
    }

    pub fn always_empty() -> Self {
        Self::default()
    }

    /// Script runs for one actor; other actors fall back to the shared script.
    pub fn for_actor(self, actor_id: &str, runs: Vec<ScriptedRun>) -> Self {
        self.per_actor
            .lock()
            .unwrap()
            .insert(actor_id.to_string(), runs.into());
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn next_run(&self, actor_id: &str) -> Option<ScriptedRun> {
        if let Some(queue) = self.per_actor.lock().unwrap().get_mut(actor_id) {
            return queue.pop_front();
        }
        self.shared.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl Scraper for FakeScraper {
    async fn run(&self, actor_id: &str, input: Value) -> Result<Vec<Value>, ScrapeError> {
        self.calls
            .lock()
            .unwrap()
            .push((actor_id.to_string(), input));

        match self.next_run(actor_id) {
            None => Ok(Vec::new()),
            Some(ScriptedRun::Items(items)) => Ok(items),
            Some(ScriptedRun::Fail) => Err(ScrapeError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }),
            Some(ScriptedRun::Unauthorized) => Err(ScrapeError::Unauthorized { status: 401 }),
            Some(ScriptedRun::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }
}
