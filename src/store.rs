//! Narrow persistence interface: durable upsert of frame projections.

use crate::frame::FrameId;
use crate::status::FrameStatus;
use derive_more::{Display, Error};
use derive_new::new;

/// Denormalized record of a frame handed to the persistence collaborator.
///
/// Status here is a projection for storage and queries only; it is never read
/// back as engine-authoritative truth.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FrameProjection {
    /// Frame id.
    pub id: FrameId,
    /// Serialized player descriptors: engine players once the game has
    /// started, raw player ids before.
    pub players: Vec<String>,
    /// Status at projection time.
    pub status: FrameStatus,
    /// Serialized board, absent before the game starts.
    pub board: Option<String>,
    /// Turn number, absent before the game starts.
    pub turn: Option<i32>,
}

/// Failure in the persistence collaborator, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Durable storage for frame projections.
pub trait FrameStore: Send + Sync {
    /// Durably upserts the projection, keyed by its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write does not complete. The registry
    /// propagates the failure to its caller unmasked.
    fn upsert(&self, frame: &FrameProjection) -> Result<(), StoreError>;
}
