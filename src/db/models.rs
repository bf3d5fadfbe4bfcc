//! Database models for persisted frame projections.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;

use crate::db::schema;
use crate::status::FrameStatus;
use crate::store::{FrameProjection, StoreError};

/// Persisted frame row as read back from the database.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::frames)]
pub struct StoredFrame {
    id: String,
    players: String,
    status: String,
    board: Option<String>,
    turn: Option<i32>,
    updated_at: NaiveDateTime,
}

impl StoredFrame {
    /// Parses the stored status string back into a [`FrameStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored string is not a valid status.
    pub fn parse_status(&self) -> Result<FrameStatus, StoreError> {
        FrameStatus::from_str(self.status())
            .map_err(|_| StoreError::new(format!("Invalid status: '{}'", self.status())))
    }

    /// Parses the stored players column back into its serialized entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the column does not hold a JSON array.
    pub fn parse_players(&self) -> Result<Vec<String>, StoreError> {
        Ok(serde_json::from_str(self.players())?)
    }
}

/// Writable frame row, built from a [`FrameProjection`] at upsert time.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::frames)]
#[diesel(treat_none_as_null = true)]
pub struct FrameRow {
    id: String,
    players: String,
    status: String,
    board: Option<String>,
    turn: Option<i32>,
    updated_at: NaiveDateTime,
}

impl TryFrom<&FrameProjection> for FrameRow {
    type Error = StoreError;

    fn try_from(frame: &FrameProjection) -> Result<Self, Self::Error> {
        Ok(Self {
            id: frame.id.clone(),
            players: serde_json::to_string(&frame.players)?,
            status: frame.status.to_string(),
            board: frame.board.clone(),
            turn: frame.turn,
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}
