use std::sync::Arc;

use crate::archive::ArchiveGuard;
use crate::prompts::DispatchEngine;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DispatchEngine>,
    pub archive_guard: Arc<ArchiveGuard>,
}

impl AppState {
    pub fn new(engine: DispatchEngine, archive_guard: ArchiveGuard) -> Self {
        Self {
            engine: Arc::new(engine),
            archive_guard: Arc::new(archive_guard),
        }
    }
}
