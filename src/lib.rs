//! Matchframe - matchmaking registry and hash-gated move arbitration for
//! two-player turn-based games.
//!
//! Anonymous remote players are paired into frames (game sessions) at random;
//! each frame derives its lifecycle status from its player count and its
//! rules engine, and move submission is arbitrated against a client-visible
//! state fingerprint so stale or conflicting updates are rejected rather
//! than applied.
//!
//! # Architecture
//!
//! - **Registry**: the authoritative frame collection - matchmaking, status
//!   queries, and the move-application protocol
//! - **Frame**: one matchable or in-progress game unit with derived status
//! - **RemotePlayer**: adapter validating network-submitted moves against the
//!   engine's current fingerprint, with a suspend/resume point for engines
//!   that pull
//! - **Engine**: the contract for the external rules engine; this crate never
//!   validates game rules itself
//! - **Store/db**: narrow persistence interface plus a SQLite projection
//!   writer
//! - **Server**: thin HTTP routing over the registry
//!
//! The rules engine is supplied by the embedding application as an
//! [`EngineFactory`]; the application wires an [`AppState`] from a
//! [`FrameRegistry`] and serves [`router`] with axum.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod analytics;
mod db;
mod engine;
mod frame;
mod player;
mod registry;
mod server;
mod status;
mod store;

// Crate-level exports - Analytics
pub use analytics::AnalyticsClient;

// Crate-level exports - Persistence
pub use db::{FrameRepository, FrameRow, StoredFrame};
pub use store::{FrameProjection, FrameStore, StoreError};

// Crate-level exports - Engine contract
pub use engine::{BoardState, Engine, EngineError, EngineFactory, EngineState};

// Crate-level exports - Core types
pub use frame::{Frame, FrameId};
pub use player::{PlayerError, PlayerId, RemotePlayer};
pub use registry::{FrameRegistry, RegistryError, SharedFrame};
pub use status::{FrameStatus, StatusSnapshot};

// Crate-level exports - HTTP surface
pub use server::{
    AppState, AuthedPlayer, HealthResponse, NewGameResponse, PLAYER_ID_HEADER, router,
};
