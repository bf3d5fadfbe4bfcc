//! SQLite persistence layer: the Diesel-backed [`FrameStore`] implementation.
//!
//! [`FrameStore`]: crate::store::FrameStore

mod error;
mod models;
mod repository;
mod schema; // Diesel schema - internal use only

pub use models::{FrameRow, StoredFrame};
pub use repository::FrameRepository;
