//! Database migrations for Channels
//!
//! Each migration is applied in its own transaction and recorded in the
//! `channel_schema_version` table.

use crate::core_channel::types::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

/// Current schema version for core_channel
pub const CURRENT_CHANNEL_SCHEMA_VERSION: i32 = 1;

/// Migration descriptor
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub up_sql: &'static str,
}

/// All available migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial channels, ownership and participants schema",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS channels (
                id BLOB PRIMARY KEY,                    -- ChannelId (16 bytes)
                group_name TEXT NOT NULL,
                channel_type TEXT NOT NULL CHECK(channel_type IN (
                    'group', 'topic', 'followingfeed', 'followers',
                    'chat', 'pinnedactivity', 'privatemessage'
                )),
                name TEXT NOT NULL DEFAULT '',
                purpose TEXT NOT NULL DEFAULT '',
                privacy TEXT NOT NULL CHECK(privacy IN ('public', 'private')),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_channels_group ON channels(group_name, created_at);

            -- Ownership is captured once at creation
            CREATE TABLE IF NOT EXISTS channel_owners (
                channel_id BLOB PRIMARY KEY,            -- ChannelId
                creator_id TEXT NOT NULL,               -- AccountId
                created_at INTEGER NOT NULL,
                FOREIGN KEY (channel_id) REFERENCES channels(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_channel_owners_creator ON channel_owners(creator_id);

            CREATE TRIGGER IF NOT EXISTS channel_owners_write_once
            BEFORE UPDATE ON channel_owners
            BEGIN
                SELECT RAISE(ABORT, 'channel ownership is write-once');
            END;

            CREATE TABLE IF NOT EXISTS channel_participants (
                channel_id BLOB NOT NULL,               -- ChannelId
                account_id TEXT NOT NULL,               -- AccountId
                added_at INTEGER NOT NULL,
                PRIMARY KEY (channel_id, account_id),
                FOREIGN KEY (channel_id) REFERENCES channels(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_channel_participants_account
                ON channel_participants(account_id);
        "#,
    }]
}

/// Get current schema version from database
pub fn get_current_version(conn: &Connection) -> Result<i32, rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS channel_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let version = conn
        .query_row(
            "SELECT version FROM channel_schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Run all pending migrations
pub fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    let current_version = get_current_version(conn)?;

    let pending: Vec<_> = get_migrations()
        .into_iter()
        .filter(|m| m.version > current_version)
        .collect();

    for migration in pending {
        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(migration.up_sql)?;
        tx.execute(
            "INSERT INTO channel_schema_version (version, applied_at) VALUES (?1, ?2)",
            params![migration.version, Timestamp::now().as_millis() as i64],
        )?;

        tx.commit()?;

        tracing::info!(
            version = migration.version,
            description = migration.description,
            "Applied channel schema migration"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    #[test]
    fn test_initial_migration() {
        let conn = setup_conn();
        migrate(&conn).expect("Migration failed");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(tables.contains(&"channels".to_string()));
        assert!(tables.contains(&"channel_owners".to_string()));
        assert!(tables.contains(&"channel_participants".to_string()));
    }

    #[test]
    fn test_idempotent_migrations() {
        let conn = setup_conn();

        migrate(&conn).expect("First migration failed");
        migrate(&conn).expect("Second migration failed");

        let version = get_current_version(&conn).expect("Failed to get version");
        assert_eq!(version, CURRENT_CHANNEL_SCHEMA_VERSION);
    }

    #[test]
    fn test_ownership_cannot_be_rewritten() {
        let conn = setup_conn();
        migrate(&conn).unwrap();

        let channel_id = vec![1u8; 16];
        conn.execute(
            "INSERT INTO channels (id, group_name, channel_type, privacy, created_at, updated_at)
             VALUES (?1, 'testgroup', 'chat', 'public', 1, 1)",
            params![channel_id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO channel_owners (channel_id, creator_id, created_at) VALUES (?1, 'alice', 1)",
            params![channel_id],
        )
        .unwrap();

        let result = conn.execute(
            "UPDATE channel_owners SET creator_id = 'mallory' WHERE channel_id = ?1",
            params![channel_id],
        );
        assert!(result.is_err());

        let creator: String = conn
            .query_row(
                "SELECT creator_id FROM channel_owners WHERE channel_id = ?1",
                params![channel_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(creator, "alice");
    }

    #[test]
    fn test_participants_cascade_with_channel() {
        let conn = setup_conn();
        migrate(&conn).unwrap();

        let channel_id = vec![2u8; 16];
        conn.execute(
            "INSERT INTO channels (id, group_name, channel_type, privacy, created_at, updated_at)
             VALUES (?1, 'testgroup', 'topic', 'private', 1, 1)",
            params![channel_id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO channel_participants (channel_id, account_id, added_at) VALUES (?1, 'bob', 2)",
            params![channel_id],
        )
        .unwrap();

        conn.execute("DELETE FROM channels WHERE id = ?1", params![channel_id])
            .unwrap();

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM channel_participants", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
