//! Remote player adapter: fingerprint gating and suspend/resume for
//! network-submitted input.

use crate::engine::{Engine, EngineError};
use derive_more::{Display, Error};
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};

/// Unique identifier for a player.
pub type PlayerId = String;

/// Usage errors raised by the adapter's suspend points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlayerError {
    /// A move suspension was requested while one is already outstanding.
    #[display("a move continuation is already pending for this player")]
    MovePending,
    /// An ack suspension was requested while one is already outstanding.
    #[display("an acknowledgement continuation is already pending for this player")]
    AckPending,
    /// The pending continuation was dropped without being resolved.
    #[display("continuation dropped before resolution")]
    Canceled,
}

/// Wraps an engine-native player with network-submission semantics.
///
/// Externally submitted moves are validated against the engine's *current*
/// fingerprint before anything is forwarded into the engine. The adapter also
/// owns the suspend point an engine parks on while waiting for this player's
/// next input ([`RemotePlayer::next_move`]); the matching resolution happens
/// in [`RemotePlayer::move_by_player`], inside the same critical section as
/// the mutation it gates.
#[derive(Debug)]
pub struct RemotePlayer {
    id: PlayerId,
    pending_move: Mutex<Option<oneshot::Sender<String>>>,
    pending_ack: Mutex<Option<oneshot::Sender<()>>>,
}

impl RemotePlayer {
    /// Creates an adapter for the player with the given id.
    #[instrument]
    pub fn new(id: impl Into<PlayerId> + std::fmt::Debug) -> Self {
        Self {
            id: id.into(),
            pending_move: Mutex::new(None),
            pending_ack: Mutex::new(None),
        }
    }

    /// The player's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Suspends until a fingerprint-validated move arrives for this player.
    ///
    /// At most one move suspension may be outstanding; the suspension holds no
    /// lock while parked, so the owning frame stays queryable and the other
    /// player can move.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::MovePending`] if a suspension is already
    /// outstanding, or [`PlayerError::Canceled`] if the adapter is dropped
    /// before resolution.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub async fn next_move(&self) -> Result<String, PlayerError> {
        let rx = {
            let mut slot = self.pending_move.lock().unwrap();
            if slot.is_some() {
                warn!("Move suspension requested while one is pending");
                return Err(PlayerError::MovePending);
            }
            let (tx, rx) = oneshot::channel();
            *slot = Some(tx);
            rx
        };
        debug!("Parked awaiting next move");
        rx.await.map_err(|_| PlayerError::Canceled)
    }

    /// Suspends until this player acknowledges the current state.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::AckPending`] if a suspension is already
    /// outstanding, or [`PlayerError::Canceled`] if the adapter is dropped
    /// before resolution.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub async fn next_ack(&self) -> Result<(), PlayerError> {
        let rx = {
            let mut slot = self.pending_ack.lock().unwrap();
            if slot.is_some() {
                warn!("Ack suspension requested while one is pending");
                return Err(PlayerError::AckPending);
            }
            let (tx, rx) = oneshot::channel();
            *slot = Some(tx);
            rx
        };
        debug!("Parked awaiting state acknowledgement");
        rx.await.map_err(|_| PlayerError::Canceled)
    }

    /// Validates `expected_hash` against the engine's current fingerprint and,
    /// on match, submits the move and resolves a pending move continuation.
    ///
    /// The fingerprint is read at the instant of comparison, not when the
    /// request arrived; requests may be delayed or reordered in transit.
    /// Returns `Ok(false)` on a stale fingerprint, leaving the engine
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the engine rejects the submission.
    #[instrument(skip(self, engine), fields(player_id = %self.id))]
    pub fn move_by_player(
        &self,
        engine: &mut dyn Engine,
        expected_hash: &str,
        move_string: &str,
    ) -> Result<bool, EngineError> {
        let current = engine.state().hash;
        if current != expected_hash {
            debug!(expected_hash, current_hash = %current, "Fingerprint mismatch, move rejected");
            return Ok(false);
        }
        engine.submit_move(&self.id, move_string)?;
        if let Some(resolve) = self.pending_move.lock().unwrap().take() {
            debug!("Resolving pending move continuation");
            let _ = resolve.send(move_string.to_string());
        }
        Ok(true)
    }

    /// Fingerprint-gated confirmation that this player has observed the state
    /// identified by `hash`. Resolves a pending ack continuation on match.
    ///
    /// Provided for engines whose protocol requires players to confirm they
    /// have seen a state before play proceeds; the registry's move protocol
    /// does not call this.
    #[instrument(skip(self, engine), fields(player_id = %self.id))]
    pub fn acknowledge_state_by_player(&self, engine: &dyn Engine, hash: &str) -> bool {
        let current = engine.state().hash;
        if current != hash {
            debug!(hash, current_hash = %current, "Fingerprint mismatch, ack rejected");
            return false;
        }
        if let Some(resolve) = self.pending_ack.lock().unwrap().take() {
            debug!("Resolving pending ack continuation");
            let _ = resolve.send(());
        }
        true
    }
}
