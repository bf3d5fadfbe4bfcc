//! The authoritative collection of frames: matchmaking, status queries, and
//! the hash-gated move-application protocol.

use crate::engine::{EngineError, EngineFactory};
use crate::frame::Frame;
use crate::player::RemotePlayer;
use crate::status::{FrameStatus, StatusSnapshot};
use crate::store::{FrameStore, StoreError};
use derive_more::{Display, Error, From};
use rand::Rng;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// A frame shared between the registry and its callers.
///
/// Every operation against one frame locks this mutex, so the
/// compare-fingerprint-then-mutate step of the move protocol is atomic.
/// Different frames proceed independently.
pub type SharedFrame = Arc<Mutex<Frame>>;

/// Errors raised by registry operations.
#[derive(Debug, Display, Error, From)]
pub enum RegistryError {
    /// The submitting player does not resolve inside the frame's engine.
    /// A caller bug, never to be confused with a hash mismatch.
    #[display("NO_SUCH_PLAYER")]
    NoSuchPlayer,
    /// `join_waiting_frame` was called with an empty waiting pool.
    #[display("no waiting frames to join")]
    NoWaitingFrames,
    /// The rules engine failed.
    Engine(EngineError),
    /// The persistence collaborator failed.
    Store(StoreError),
}

/// Registry owning the lifecycle and querying of all frames.
///
/// Frames are appended, never removed; cleanup is an external policy. The
/// frame list is guarded by its own lock, taken before any per-frame lock.
pub struct FrameRegistry {
    frames: Mutex<Vec<SharedFrame>>,
    engines: Arc<dyn EngineFactory>,
    store: Arc<dyn FrameStore>,
}

impl FrameRegistry {
    /// Creates a registry with the given engine and persistence collaborators.
    pub fn new(engines: Arc<dyn EngineFactory>, store: Arc<dyn FrameStore>) -> Self {
        info!("Creating frame registry");
        Self {
            frames: Mutex::new(Vec::new()),
            engines,
            store,
        }
    }

    /// Allocates a new frame holding `player` as its sole member, appends it
    /// to the registry and syncs it to storage.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`] if the persistence sync fails.
    #[instrument(skip(self, player), fields(player_id = %player.id()))]
    pub fn create_waiting_frame(
        &self,
        player: Arc<RemotePlayer>,
    ) -> Result<SharedFrame, RegistryError> {
        let mut frame = Frame::new();
        frame.add_player(player);
        let projection = frame.projection();
        info!(frame_id = %frame.id(), "Created waiting frame");
        let shared = Arc::new(Mutex::new(frame));
        self.frames.lock().unwrap().push(Arc::clone(&shared));
        self.store.upsert(&projection)?;
        Ok(shared)
    }

    /// True iff at least one frame is currently waiting for players.
    pub fn any_waiting_frames(&self) -> bool {
        !self.waiting_frames().is_empty()
    }

    /// All frames with status `WAITING_FOR_PLAYERS`, in registry insertion
    /// order. Selection for pairing is random, not FIFO; the stable order
    /// exists for observability.
    pub fn waiting_frames(&self) -> Vec<SharedFrame> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.lock().unwrap().status() == FrameStatus::WaitingForPlayers)
            .cloned()
            .collect()
    }

    /// Pairs `player` into a uniformly random waiting frame: seats the
    /// player, decides who moves first with an independent coin flip, builds
    /// and starts the engine, and syncs to storage.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoWaitingFrames`] when the waiting pool is
    /// empty, [`RegistryError::Engine`] if the engine fails to start, or
    /// [`RegistryError::Store`] if the persistence sync fails.
    #[instrument(skip(self, player), fields(player_id = %player.id()))]
    pub fn join_waiting_frame(
        &self,
        player: Arc<RemotePlayer>,
    ) -> Result<SharedFrame, RegistryError> {
        let waiting = self.waiting_frames();
        if waiting.is_empty() {
            warn!("Join requested with no waiting frames");
            return Err(RegistryError::NoWaitingFrames);
        }
        let pick = rand::thread_rng().gen_range(0..waiting.len());
        let shared = Arc::clone(&waiting[pick]);
        let projection = {
            let mut frame = shared.lock().unwrap();
            frame.add_player(player);
            let first = rand::thread_rng().gen_range(0..2usize);
            let second = (first + 1) % 2;
            let mut engine = self.engines.create(
                Arc::clone(&frame.players()[first]),
                Arc::clone(&frame.players()[second]),
            );
            engine.begin()?;
            frame.install_engine(engine);
            info!(frame_id = %frame.id(), first_mover = first, "Frame paired, game started");
            frame.projection()
        };
        self.store.upsert(&projection)?;
        Ok(shared)
    }

    /// Linear lookup by id. An unknown id is a structural absence, not an
    /// error.
    pub fn frame_by_id(&self, id: &str) -> Option<SharedFrame> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.lock().unwrap().id() == id)
            .cloned()
    }

    /// Status snapshot for `id`; `NONEXISTENT` when no such frame exists.
    #[instrument(skip(self))]
    pub fn frame_status(&self, id: &str) -> StatusSnapshot {
        match self.frame_by_id(id) {
            Some(shared) => shared.lock().unwrap().snapshot(),
            None => {
                debug!(frame_id = id, "Frame not found");
                StatusSnapshot::nonexistent()
            }
        }
    }

    /// Applies the move protocol: resolve the frame, gate on `IN_PROGRESS`,
    /// resolve the player, compare the client's fingerprint against the
    /// engine's current one and mutate only on a match.
    ///
    /// A move against a frame that is not playable is silently dropped and
    /// the frame's unmodified snapshot returned. A stale fingerprint yields a
    /// `HASH_MISMATCH` snapshot that still carries the post-attempt hash and
    /// state, so the client can re-derive a correct fingerprint without a
    /// second round trip. Accepted moves are synced to storage before the
    /// snapshot is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoSuchPlayer`] if `player_id` does not
    /// resolve inside the engine, [`RegistryError::Engine`] if the engine
    /// fails, or [`RegistryError::Store`] if the persistence sync fails.
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        id: &str,
        player_id: &str,
        move_string: &str,
        expected_hash: &str,
    ) -> Result<StatusSnapshot, RegistryError> {
        let Some(shared) = self.frame_by_id(id) else {
            debug!(frame_id = id, "Move targets an unknown frame");
            return Ok(StatusSnapshot::nonexistent());
        };
        let (mut snapshot, accepted, projection) = {
            let mut frame = shared.lock().unwrap();
            if frame.status() != FrameStatus::InProgress {
                debug!(status = %frame.status(), "Frame not playable, move dropped");
                return Ok(frame.snapshot());
            }
            let accepted = frame.submit(player_id, expected_hash, move_string)?;
            (frame.snapshot(), accepted, frame.projection())
        };
        if accepted {
            self.store.upsert(&projection)?;
            info!(status = %snapshot.status, "Move applied");
        } else {
            snapshot.status = FrameStatus::HashMismatch;
            debug!("Move rejected on stale fingerprint");
        }
        Ok(snapshot)
    }

    /// Total number of frames ever created.
    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    /// Number of frames currently waiting for players.
    pub fn waiting_frame_count(&self) -> usize {
        self.waiting_frames().len()
    }

    /// Number of completed frames.
    pub fn completed_frame_count(&self) -> usize {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.lock().unwrap().status() == FrameStatus::Completed)
            .count()
    }
}
