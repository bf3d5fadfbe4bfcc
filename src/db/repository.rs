//! Database repository for frame projections.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::models::{FrameRow, StoredFrame};
use crate::db::schema;
use crate::store::{FrameProjection, FrameStore, StoreError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed repository for frame projections.
#[derive(Debug, Clone)]
pub struct FrameRepository {
    db_path: String,
}

impl FrameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, StoreError> {
        info!(path = %db_path, "Creating FrameRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository from the `DATABASE_URL` environment variable,
    /// falling back to `matchframe.db` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the resolved path is invalid.
    #[instrument]
    pub fn from_env() -> Result<Self, StoreError> {
        dotenvy::dotenv().ok();
        let db_path =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "matchframe.db".to_string());
        Self::new(db_path)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running pending migrations");
        let mut conn = self.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        Ok(())
    }

    /// Writes the projection, inserting or replacing the row keyed by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    #[instrument(skip(self, frame), fields(frame_id = %frame.id, status = %frame.status))]
    pub fn upsert_frame(&self, frame: &FrameProjection) -> Result<(), StoreError> {
        debug!("Upserting frame projection");
        let mut conn = self.connection()?;

        let row = FrameRow::try_from(frame)?;
        diesel::insert_into(schema::frames::table)
            .values(&row)
            .on_conflict(schema::frames::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)?;

        info!("Frame projection stored");
        Ok(())
    }

    /// Reads a stored frame back by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_frame(&self, frame_id: &str) -> Result<Option<StoredFrame>, StoreError> {
        debug!(frame_id, "Looking up stored frame");
        let mut conn = self.connection()?;

        let stored = schema::frames::table
            .filter(schema::frames::id.eq(frame_id))
            .first::<StoredFrame>(&mut conn)
            .optional()?;

        if stored.is_some() {
            debug!(frame_id, "Stored frame found");
        } else {
            debug!(frame_id, "Stored frame not found");
        }

        Ok(stored)
    }
}

impl FrameStore for FrameRepository {
    fn upsert(&self, frame: &FrameProjection) -> Result<(), StoreError> {
        self.upsert_frame(frame)
    }
}
