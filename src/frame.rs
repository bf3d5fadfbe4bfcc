//! One matchable or in-progress two-player game unit.

use crate::engine::Engine;
use crate::player::RemotePlayer;
use crate::registry::RegistryError;
use crate::status::{FrameStatus, StatusSnapshot};
use crate::store::FrameProjection;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Unique identifier for a frame.
pub type FrameId = String;

/// A frame owns a player list and, once full, a rules-engine instance.
///
/// A frame with an engine always has exactly two players; a frame without one
/// has zero or one. Status is never stored: it is recomputed from the player
/// count and the engine's game-over flag on every query, so it cannot go
/// stale relative to engine mutation.
pub struct Frame {
    id: FrameId,
    players: Vec<Arc<RemotePlayer>>,
    engine: Option<Box<dyn Engine>>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("players", &self.players)
            .field("has_engine", &self.engine.is_some())
            .finish()
    }
}

impl Frame {
    /// Creates an empty frame with a fresh id.
    #[instrument]
    pub(crate) fn new() -> Self {
        let id = Uuid::new_v4().to_string();
        info!(frame_id = %id, "Creating frame");
        Self {
            id,
            players: Vec::new(),
            engine: None,
        }
    }

    /// The frame's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Seated players, in insertion order.
    pub fn players(&self) -> &[Arc<RemotePlayer>] {
        &self.players
    }

    /// The engine, once the frame has started.
    pub fn engine(&self) -> Option<&dyn Engine> {
        self.engine.as_deref()
    }

    /// Seats a player. Insertion order is significant: the first two players
    /// fill the frame.
    #[instrument(skip(self, player), fields(frame_id = %self.id, player_id = %player.id()))]
    pub(crate) fn add_player(&mut self, player: Arc<RemotePlayer>) {
        info!(seated = self.players.len(), "Seating player");
        self.players.push(player);
    }

    /// Installs the started engine once both players are seated.
    pub(crate) fn install_engine(&mut self, engine: Box<dyn Engine>) {
        self.engine = Some(engine);
    }

    /// Derives the frame's lifecycle status.
    pub fn status(&self) -> FrameStatus {
        if self.players.len() < 2 {
            return FrameStatus::WaitingForPlayers;
        }
        match &self.engine {
            Some(engine) if engine.state().state.game_over => FrameStatus::Completed,
            _ => FrameStatus::InProgress,
        }
    }

    /// Snapshot of the frame's externally visible state. Carries the engine's
    /// fingerprint and state whenever the game has started.
    pub fn snapshot(&self) -> StatusSnapshot {
        let status = self.status();
        match &self.engine {
            Some(engine) if status != FrameStatus::WaitingForPlayers => {
                let state = engine.state();
                StatusSnapshot::with_state(status, state.hash, state.state)
            }
            _ => StatusSnapshot::bare(status),
        }
    }

    /// Fingerprint-gated move submission: resolves the submitting player
    /// inside the engine, then delegates comparison and mutation to the
    /// adapter. Returns whether the move was accepted.
    ///
    /// Callers gate on [`Frame::status`] being `IN_PROGRESS` first, which
    /// guarantees an engine is installed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoSuchPlayer`] when `player_id` does not
    /// resolve inside the engine; this is a caller bug, not a hash mismatch.
    #[instrument(skip(self), fields(frame_id = %self.id))]
    pub(crate) fn submit(
        &mut self,
        player_id: &str,
        expected_hash: &str,
        move_string: &str,
    ) -> Result<bool, RegistryError> {
        let engine = self
            .engine
            .as_mut()
            .expect("in-progress frame must have an engine");
        let Some(player) = engine.player_by_id(player_id) else {
            warn!(player_id, "Move from a player the engine cannot resolve");
            return Err(RegistryError::NoSuchPlayer);
        };
        Ok(player.move_by_player(engine.as_mut(), expected_hash, move_string)?)
    }

    /// Denormalized persistence projection of the frame.
    pub fn projection(&self) -> FrameProjection {
        match &self.engine {
            Some(engine) => {
                let state = engine.state();
                FrameProjection::new(
                    self.id.clone(),
                    state.state.players.iter().map(|p| p.to_string()).collect(),
                    self.status(),
                    Some(state.state.board.to_string()),
                    Some(state.state.turn),
                )
            }
            None => FrameProjection::new(
                self.id.clone(),
                self.players.iter().map(|p| p.id().to_string()).collect(),
                self.status(),
                None,
                None,
            ),
        }
    }
}
