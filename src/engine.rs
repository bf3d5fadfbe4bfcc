//! Contract through which the external rules engine is consumed.
//!
//! The registry never inspects game rules. It sees an engine as an opaque
//! object that reports a fingerprinted state, resolves seated players by id,
//! and accepts submitted moves. Legal-move generation, turn-order enforcement
//! and win/draw detection all live behind this trait.

use crate::player::RemotePlayer;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque board/turn representation reported by an engine.
///
/// The registry only ever reads `game_over`; the rest is carried through to
/// clients and to the persistence projection untouched.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct BoardState {
    /// Whether the game has ended.
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    /// Turn counter.
    pub turn: i32,
    /// Engine-defined player descriptors.
    pub players: Vec<serde_json::Value>,
    /// Engine-defined board representation.
    pub board: serde_json::Value,
}

/// Fingerprinted engine state.
///
/// `hash` is the digest clients echo back with their next move; it changes
/// whenever `state` changes.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct EngineState {
    /// Opaque digest of `state`.
    pub hash: String,
    /// The state the hash covers.
    pub state: BoardState,
}

/// Failure inside the rules engine, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine error: {} at {}:{}", message, file, line)]
pub struct EngineError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl EngineError {
    /// Creates a new engine error with caller location tracking.
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

/// A rules engine driving one two-player game.
///
/// Callers mutate the engine only through [`Engine::submit_move`], and only
/// while holding the owning frame's lock, so the fingerprint comparison in
/// [`RemotePlayer::move_by_player`] and the mutation it gates are atomic.
/// Engines that drive play by awaiting [`RemotePlayer::next_move`] observe
/// the same move string through the resolved continuation.
pub trait Engine: Send {
    /// Starts the game: computes the first state and fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the engine cannot start.
    fn begin(&mut self) -> Result<(), EngineError>;

    /// Current fingerprinted state, captured at the instant of the call.
    fn state(&self) -> EngineState;

    /// Resolves a seated player by id.
    fn player_by_id(&self, player_id: &str) -> Option<Arc<RemotePlayer>>;

    /// Applies a move for the given player.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] for engine-internal failures. Move legality is
    /// entirely the engine's business.
    fn submit_move(&mut self, player_id: &str, move_string: &str) -> Result<(), EngineError>;
}

/// Constructs engines for freshly paired frames.
///
/// The first player passed to [`EngineFactory::create`] moves first; the
/// registry decides that ordering with a coin flip at pairing time.
pub trait EngineFactory: Send + Sync {
    /// Builds an engine seating `first` and `second` in move order.
    fn create(&self, first: Arc<RemotePlayer>, second: Arc<RemotePlayer>) -> Box<dyn Engine>;
}
