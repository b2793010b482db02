//! Test doubles shared by the core unit tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use formcraft_types::error::StorageError;
use formcraft_types::llm::{GenerationRequest, LlmError};
use formcraft_types::storage::BlobEntry;

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::breaker::CircuitBreaker;
use crate::llm::provider::LlmProvider;
use crate::llm::resilient::ResilientGenerator;
use crate::llm::retry::RetryPolicy;
use crate::storage::blob_store::BlobStore;

/// Scripted provider that counts calls and records prompts.
pub struct MockProvider {
    scripted: Mutex<VecDeque<Result<String, LlmError>>>,
    then: Result<String, LlmError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn always(result: Result<String, LlmError>) -> Self {
        Self::sequence(Vec::new(), result)
    }

    /// Return `scripted` in order, then `then` forever.
    pub fn sequence(scripted: Vec<Result<String, LlmError>>, then: Result<String, LlmError>) -> Self {
        Self {
            scripted: Mutex::new(scripted.into()),
            then,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let next = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.then.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next
    }
}

/// Wrap a mock in a generator that retries without waiting.
pub fn generator(provider: MockProvider) -> Arc<ResilientGenerator> {
    generator_with_breaker(provider, Arc::new(CircuitBreaker::default()))
}

pub fn generator_with_breaker(
    provider: MockProvider,
    breaker: Arc<CircuitBreaker>,
) -> Arc<ResilientGenerator> {
    Arc::new(ResilientGenerator::new(
        Arc::new(BoxLlmProvider::new(provider)),
        breaker,
        RetryPolicy::immediate(2),
    ))
}

const MEMORY_URL_PREFIX: &str = "memory://";

/// In-memory blob store with failure switches.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<String, (Vec<u8>, BlobEntry)>>,
    fail_all: AtomicBool,
    /// Puts under this prefix fail.
    fail_prefix: Mutex<Option<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    pub fn fail_puts_under(&self, prefix: &str) {
        *self.fail_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    pub fn paths(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(StorageError::Io("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<BlobEntry, StorageError> {
        self.check()?;
        if let Some(prefix) = self.fail_prefix.lock().unwrap().as_deref() {
            if path.starts_with(prefix) {
                return Err(StorageError::Io(format!("cannot write {path}")));
            }
        }
        let entry = BlobEntry {
            path: path.to_string(),
            url: format!("{MEMORY_URL_PREFIX}{path}"),
            size: bytes.len() as u64,
            uploaded_at: Utc::now(),
        };
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), (bytes, entry.clone()));
        Ok(entry)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>, StorageError> {
        self.check()?;
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(_, (_, entry))| entry.clone())
            .collect())
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        self.check()?;
        let path = url.strip_prefix(MEMORY_URL_PREFIX).unwrap_or(url);
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.check()?;
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}
