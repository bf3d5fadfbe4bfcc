//! Status vocabulary and the snapshot value object returned to callers.

use crate::engine::BoardState;
use crate::frame::FrameId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Externally visible status of a frame.
///
/// `WaitingForPlayers`, `InProgress` and `Completed` are the lifecycle states,
/// in that order; no transition ever goes backward. `HashMismatch` and
/// `Nonexistent` are registry answers rather than frame states: a move
/// rejected on a stale fingerprint, and an unknown frame id. The serialized
/// strings are part of the wire contract and must round-trip unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameStatus {
    /// Fewer than two players are seated.
    WaitingForPlayers,
    /// Both players are seated and the engine reports an ongoing game.
    InProgress,
    /// The engine reports the game over.
    Completed,
    /// A submitted move carried a stale fingerprint and was rejected.
    HashMismatch,
    /// No frame with the requested id exists.
    Nonexistent,
}

/// Snapshot of a frame's externally visible state.
///
/// `hash` and `state` are present whenever the frame has a started engine;
/// `game_id` is attached by the transport layer before the snapshot goes out
/// on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Status at snapshot time.
    pub status: FrameStatus,
    /// Engine fingerprint of the current board/turn state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Opaque engine board/turn state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<BoardState>,
    /// Frame id, attached by the transport layer.
    #[serde(rename = "gameId", skip_serializing_if = "Option::is_none")]
    pub game_id: Option<FrameId>,
}

impl StatusSnapshot {
    /// Snapshot carrying a status alone.
    pub fn bare(status: FrameStatus) -> Self {
        Self {
            status,
            hash: None,
            state: None,
            game_id: None,
        }
    }

    /// Snapshot for an unknown frame id.
    pub fn nonexistent() -> Self {
        Self::bare(FrameStatus::Nonexistent)
    }

    /// Snapshot carrying the engine's current fingerprint and state.
    pub fn with_state(status: FrameStatus, hash: String, state: BoardState) -> Self {
        Self {
            status,
            hash: Some(hash),
            state: Some(state),
            game_id: None,
        }
    }

    /// Attaches the frame id for the wire.
    pub fn with_game_id(mut self, game_id: impl Into<FrameId>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }
}
