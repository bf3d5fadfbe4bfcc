//! Shared test doubles: a scripted rules engine and recording collaborators.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use matchframe::{
    BoardState, Engine, EngineError, EngineFactory, EngineState, FrameProjection, FrameStore,
    RemotePlayer, StoreError,
};

/// A move as recorded by the stub engine: `(player_id, move_string)`.
pub type RecordedMove = (String, String);

/// Installs a tracing subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Scripted rules engine. Accepts any submitted move, bumps the turn counter
/// (and with it the fingerprint `h0`, `h1`, ...), and reports the game over
/// once `moves_to_finish` moves have been applied.
pub struct StubEngine {
    players: Vec<Arc<RemotePlayer>>,
    turn: i32,
    moves_to_finish: i32,
    log: Arc<Mutex<Vec<RecordedMove>>>,
}

impl StubEngine {
    /// Creates an engine seating `first` and `second`, sharing `log` with the
    /// test so submissions stay observable after the engine is boxed.
    pub fn new(
        first: Arc<RemotePlayer>,
        second: Arc<RemotePlayer>,
        moves_to_finish: i32,
        log: Arc<Mutex<Vec<RecordedMove>>>,
    ) -> Self {
        Self {
            players: vec![first, second],
            turn: 0,
            moves_to_finish,
            log,
        }
    }
}

impl Engine for StubEngine {
    fn begin(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn state(&self) -> EngineState {
        EngineState::new(
            format!("h{}", self.turn),
            BoardState::new(
                self.turn >= self.moves_to_finish,
                self.turn,
                self.players
                    .iter()
                    .map(|p| serde_json::json!({ "id": p.id() }))
                    .collect(),
                serde_json::json!({ "moves": self.turn }),
            ),
        )
    }

    fn player_by_id(&self, player_id: &str) -> Option<Arc<RemotePlayer>> {
        self.players.iter().find(|p| p.id() == player_id).cloned()
    }

    fn submit_move(&mut self, player_id: &str, move_string: &str) -> Result<(), EngineError> {
        self.log
            .lock()
            .unwrap()
            .push((player_id.to_string(), move_string.to_string()));
        self.turn += 1;
        Ok(())
    }
}

/// Factory producing [`StubEngine`]s. Keeps a shared move log and the seating
/// order of every engine it creates.
pub struct StubEngineFactory {
    moves_to_finish: i32,
    log: Arc<Mutex<Vec<RecordedMove>>>,
    seatings: Arc<Mutex<Vec<(String, String)>>>,
}

impl StubEngineFactory {
    pub fn new(moves_to_finish: i32) -> Self {
        Self {
            moves_to_finish,
            log: Arc::new(Mutex::new(Vec::new())),
            seatings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the shared move log.
    pub fn log(&self) -> Arc<Mutex<Vec<RecordedMove>>> {
        Arc::clone(&self.log)
    }

    /// Handle onto the recorded `(first, second)` seatings.
    pub fn seatings(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.seatings)
    }
}

impl EngineFactory for StubEngineFactory {
    fn create(&self, first: Arc<RemotePlayer>, second: Arc<RemotePlayer>) -> Box<dyn Engine> {
        self.seatings
            .lock()
            .unwrap()
            .push((first.id().to_string(), second.id().to_string()));
        Box::new(StubEngine::new(
            first,
            second,
            self.moves_to_finish,
            Arc::clone(&self.log),
        ))
    }
}

/// In-memory store recording every upserted projection.
#[derive(Default)]
pub struct RecordingStore {
    pub upserts: Mutex<Vec<FrameProjection>>,
}

impl RecordingStore {
    pub fn count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<FrameProjection> {
        self.upserts.lock().unwrap().last().cloned()
    }
}

impl FrameStore for RecordingStore {
    fn upsert(&self, frame: &FrameProjection) -> Result<(), StoreError> {
        self.upserts.lock().unwrap().push(frame.clone());
        Ok(())
    }
}

/// Store that fails every write, for collaborator-failure tests.
pub struct FailingStore;

impl FrameStore for FailingStore {
    fn upsert(&self, _frame: &FrameProjection) -> Result<(), StoreError> {
        Err(StoreError::new("store unavailable"))
    }
}
