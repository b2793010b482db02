//! Application state wiring all services together.
//!
//! Services in formcraft-core are generic over the blob store; AppState pins
//! them to the filesystem implementation from formcraft-infra.

use std::path::PathBuf;
use std::sync::Arc;

use formcraft_core::designer::FormDesigner;
use formcraft_core::llm::breaker::CircuitBreaker;
use formcraft_core::llm::resilient::ResilientGenerator;
use formcraft_core::llm::retry::RetryPolicy;
use formcraft_core::responder::SubmissionResponder;
use formcraft_core::service::backup::BackupService;
use formcraft_core::service::forms::FormService;
use formcraft_core::service::submissions::SubmissionService;
use formcraft_infra::blob::filesystem::LocalBlobStore;
use formcraft_infra::config::{load_global_config, resolve_data_dir};
use formcraft_infra::llm::{build_generator, create_provider};
use formcraft_types::config::GlobalConfig;

pub type ConcreteFormService = FormService<LocalBlobStore>;
pub type ConcreteSubmissionService = SubmissionService<LocalBlobStore>;
pub type ConcreteBackupService = BackupService<LocalBlobStore>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub store: Arc<LocalBlobStore>,
    /// One breaker per process, shared by every generator.
    pub breaker: Arc<CircuitBreaker>,
    pub generator: Option<Arc<ResilientGenerator>>,
    pub designer: Arc<FormDesigner>,
    pub form_service: ConcreteFormService,
    pub submission_service: Arc<ConcreteSubmissionService>,
    pub backup_service: Arc<ConcreteBackupService>,
}

impl AppState {
    /// Resolve the data directory, load `config.toml` and wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        Ok(Self::from_config(data_dir, config))
    }

    pub fn from_config(data_dir: PathBuf, config: GlobalConfig) -> Self {
        let store = Arc::new(LocalBlobStore::new(&data_dir, config.server.base_url()));
        let breaker = Arc::new(CircuitBreaker::from_config(&config.breaker));
        let generator = build_generator(&config, Arc::clone(&breaker));
        Self::with_generator(data_dir, config, store, breaker, generator)
    }

    /// Wire services around an explicit generator.
    pub fn with_generator(
        data_dir: PathBuf,
        config: GlobalConfig,
        store: Arc<LocalBlobStore>,
        breaker: Arc<CircuitBreaker>,
        generator: Option<Arc<ResilientGenerator>>,
    ) -> Self {
        let model = config.gemini.model.clone();
        let designer = FormDesigner::from_config(generator.clone(), model.clone(), &config.designer);
        let responder = SubmissionResponder::new(generator.clone(), model);

        Self {
            form_service: FormService::new(Arc::clone(&store)),
            submission_service: Arc::new(SubmissionService::new(Arc::clone(&store), responder)),
            backup_service: Arc::new(BackupService::new(Arc::clone(&store))),
            designer: Arc::new(designer),
            config: Arc::new(config),
            data_dir,
            store,
            breaker,
            generator,
        }
    }

    /// Generator for a caller-supplied key, sharing the process breaker.
    ///
    /// Falls back to the configured generator when `api_key` is `None`.
    pub fn generator_for_key(&self, api_key: Option<&str>) -> Option<Arc<ResilientGenerator>> {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Some(Arc::new(ResilientGenerator::new(
                Arc::new(create_provider(&self.config.gemini, key)),
                Arc::clone(&self.breaker),
                RetryPolicy::from_config(&self.config.retry),
            ))),
            None => self.generator.clone(),
        }
    }

    pub fn public_url(&self) -> &str {
        self.config.server.base_url()
    }
}
