//! Dependencies injected into the reducers

use crate::transport::Transport;
use std::sync::Arc;

/// Environment dependencies for the todolist reducers
#[derive(Clone)]
pub struct SyncEnvironment {
    /// Remote service binding used by the synchronization procedures
    pub transport: Arc<dyn Transport>,
}

impl SyncEnvironment {
    /// Creates a new `SyncEnvironment`
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl std::fmt::Debug for SyncEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEnvironment").finish_non_exhaustive()
    }
}
