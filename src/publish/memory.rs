use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EstimateRegister, PublishError, check_finite};

/// In-memory register (non-persistent)
///
/// Clones share the same slot, so one clone can be handed to the estimator
/// and others to readers.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegister {
    value: Arc<RwLock<Option<f64>>>,
}

impl MemoryRegister {
    /// Create an empty register
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EstimateRegister for MemoryRegister {
    async fn publish(&self, value: f64) -> Result<(), PublishError> {
        check_finite(value)?;
        *self.value.write().await = Some(value);
        Ok(())
    }

    async fn read(&self) -> Result<f64, PublishError> {
        self.value.read().await.ok_or(PublishError::NotPublished)
    }
}
