use std::sync::Arc;

use crate::backend::ArchiveBackend;
use crate::config::Config;
use crate::errorlog::ErrorSink;
use crate::import::Importer;
use crate::observability::Metrics;

/// Shared across requests; nothing in it is mutated per import except the counters
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub importer: Arc<Importer>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn ArchiveBackend>,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        let metrics = Arc::new(Metrics::new());
        let importer = Importer::new(backend, sink, metrics.clone());

        Self {
            config: Arc::new(config),
            importer: Arc::new(importer),
            metrics,
        }
    }
}
