//! Cross-process publication of the offset estimate.
//!
//! The estimator process is the single writer; any number of latency
//! processes read. A reader may see the previous estimate but never a torn
//! one, and a missing estimate is reported as such rather than as zero.

mod file;
mod memory;


use async_trait::async_trait;

pub use file::FileRegister;
pub use memory::MemoryRegister;

/// Size of a published estimate on storage.
pub const ESTIMATE_SIZE: usize = std::mem::size_of::<f64>();

/// Durable single-writer/multi-reader register holding one offset.
#[async_trait]
pub trait EstimateRegister: Send + Sync {
    /// Replace the published estimate.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not finite or cannot be stored durably
    async fn publish(&self, value: f64) -> Result<(), PublishError>;

    /// Read the most recently published estimate.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::NotPublished`] if nothing was published yet and
    /// [`PublishError::Corrupt`] if the stored record is malformed
    async fn read(&self) -> Result<f64, PublishError>;
}

/// Publication errors
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Storage I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing has been published yet
    #[error("no estimate published yet")]
    NotPublished,

    /// The stored record has the wrong size
    #[error("corrupt estimate record: {len} bytes, expected {ESTIMATE_SIZE}")]
    Corrupt {
        /// Size of the stored record
        len: usize,
    },

    /// NaN or infinity cannot be published
    #[error("refusing to publish non-finite estimate {0}")]
    NonFinite(f64),
}

/// Reject values that must never reach a reader.
pub(crate) fn check_finite(value: f64) -> Result<(), PublishError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PublishError::NonFinite(value))
    }
}
