//! SQL-based storage implementation for Channels

use super::migrations::migrate;
use super::ChannelStore;
use crate::config::StoreConfig;
use crate::core_channel::channel::{Channel, ChannelOwnership, ChannelPrivacy, ChannelType};
use crate::core_channel::errors::{ChannelError, ChannelResult};
use crate::core_channel::participant::Participant;
use crate::core_channel::types::{AccountId, ChannelId, Timestamp};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, OptionalExtension, Row};

const CHANNEL_SELECT: &str = "SELECT c.id, o.creator_id, c.group_name, c.channel_type, c.name, \
     c.purpose, c.privacy, c.created_at, c.updated_at \
     FROM channels c INNER JOIN channel_owners o ON o.channel_id = c.id";

/// SQL-based storage for Channels
pub struct ChannelSqlStore {
    pool: Pool<SqliteConnectionManager>,
}

impl ChannelSqlStore {
    /// Wrap an existing pool, running pending migrations
    pub fn new(pool: Pool<SqliteConnectionManager>) -> ChannelResult<Self> {
        {
            let conn = pool.get()?;
            migrate(&conn)?;
        }

        Ok(Self { pool })
    }

    /// Open the database described by `config`.
    ///
    /// Without a database path the store is a single in-memory connection.
    pub fn open(config: &StoreConfig) -> ChannelResult<Self> {
        let busy_timeout = config.busy_timeout;
        let init = move |conn: &mut rusqlite::Connection| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        };

        let pool = match &config.database_path {
            Some(path) => Pool::builder()
                .max_size(config.pool_size)
                .build(SqliteConnectionManager::file(path).with_init(init))?,
            // The database lives and dies with its only connection
            None => Pool::builder()
                .max_size(1)
                .max_lifetime(None)
                .idle_timeout(None)
                .build(SqliteConnectionManager::memory().with_init(init))?,
        };

        Self::new(pool)
    }

    /// Create a new in-memory store
    pub fn memory() -> ChannelResult<Self> {
        Self::open(&StoreConfig {
            database_path: None,
            ..StoreConfig::default()
        })
    }
}

fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        creator_id: row.get(1)?,
        group_name: row.get(2)?,
        channel_type: row.get(3)?,
        name: row.get(4)?,
        purpose: row.get(5)?,
        privacy: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    Ok(Participant {
        channel_id: row.get(0)?,
        account_id: row.get(1)?,
        added_at: row.get(2)?,
    })
}

impl ChannelStore for ChannelSqlStore {
    fn create_channel(&self, channel: &Channel) -> ChannelResult<()> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO channels (id, group_name, channel_type, name, purpose, privacy, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                channel.id,
                channel.group_name,
                channel.channel_type,
                channel.name,
                channel.purpose,
                channel.privacy,
                channel.created_at,
                channel.updated_at,
            ],
        )?;

        tx.execute(
            "INSERT INTO channel_owners (channel_id, creator_id, created_at) VALUES (?1, ?2, ?3)",
            params![channel.id, channel.creator_id, channel.created_at],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_channel(&self, channel_id: &ChannelId) -> ChannelResult<Option<Channel>> {
        let conn = self.pool.get()?;
        let channel = conn
            .query_row(
                &format!("{CHANNEL_SELECT} WHERE c.id = ?1"),
                params![channel_id],
                channel_from_row,
            )
            .optional()?;
        Ok(channel)
    }

    fn get_ownership(&self, channel_id: &ChannelId) -> ChannelResult<Option<ChannelOwnership>> {
        let conn = self.pool.get()?;
        let ownership = conn
            .query_row(
                "SELECT channel_id, creator_id, created_at FROM channel_owners WHERE channel_id = ?1",
                params![channel_id],
                |row| Ok(ChannelOwnership::new(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(ownership)
    }

    fn update_channel_metadata(&self, channel: &Channel) -> ChannelResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE channels SET name = ?1, purpose = ?2, privacy = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                channel.name,
                channel.purpose,
                channel.privacy,
                channel.updated_at,
                channel.id,
            ],
        )?;
        Ok(rows > 0)
    }

    fn delete_channel(&self, channel_id: &ChannelId) -> ChannelResult<bool> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM channel_participants WHERE channel_id = ?1",
            params![channel_id],
        )?;
        tx.execute(
            "DELETE FROM channel_owners WHERE channel_id = ?1",
            params![channel_id],
        )?;
        let rows = tx.execute("DELETE FROM channels WHERE id = ?1", params![channel_id])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    fn list_group_channels(&self, group_name: &str) -> ChannelResult<Vec<Channel>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{CHANNEL_SELECT} WHERE c.group_name = ?1 ORDER BY c.created_at, c.id"
        ))?;

        let channels = stmt
            .query_map(params![group_name], channel_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(channels)
    }

    fn insert_participant(&self, participant: &Participant) -> ChannelResult<Participant> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM channels WHERE id = ?1",
                params![participant.channel_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(ChannelError::InvalidChannel(participant.channel_id));
        }

        tx.execute(
            "INSERT OR IGNORE INTO channel_participants (channel_id, account_id, added_at)
             VALUES (?1, ?2, ?3)",
            params![
                participant.channel_id,
                participant.account_id,
                participant.added_at,
            ],
        )?;

        let stored = tx.query_row(
            "SELECT channel_id, account_id, added_at FROM channel_participants
             WHERE channel_id = ?1 AND account_id = ?2",
            params![participant.channel_id, participant.account_id],
            participant_from_row,
        )?;

        tx.commit()?;
        Ok(stored)
    }

    fn get_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<Option<Participant>> {
        let conn = self.pool.get()?;
        let participant = conn
            .query_row(
                "SELECT channel_id, account_id, added_at FROM channel_participants
                 WHERE channel_id = ?1 AND account_id = ?2",
                params![channel_id, account_id],
                participant_from_row,
            )
            .optional()?;
        Ok(participant)
    }

    fn delete_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "DELETE FROM channel_participants WHERE channel_id = ?1 AND account_id = ?2",
            params![channel_id, account_id],
        )?;
        Ok(rows > 0)
    }

    fn list_participants(&self, channel_id: &ChannelId) -> ChannelResult<Vec<Participant>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT channel_id, account_id, added_at FROM channel_participants
             WHERE channel_id = ?1 ORDER BY account_id",
        )?;

        let participants = stmt
            .query_map(params![channel_id], participant_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(participants)
    }
}

// ===== Column conversions =====

impl ToSql for ChannelId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(&self.0[..]))
    }
}

impl FromSql for ChannelId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let blob = value.as_blob()?;
        let bytes: [u8; 16] = blob.try_into().map_err(|_| FromSqlError::InvalidBlobSize {
            expected_size: 16,
            blob_size: blob.len(),
        })?;
        Ok(ChannelId(bytes))
    }
}

impl ToSql for AccountId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for AccountId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(AccountId)
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0 as i64))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(|millis| Timestamp(millis.max(0) as u64))
    }
}

impl ToSql for ChannelType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ChannelType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for ChannelPrivacy {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ChannelPrivacy {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
