//! SQL schema for the Shelf SQLite store.
//!
//! Executed once at connection startup. There is no migration path; the
//! `user_version` pragma only records which layout created the file.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids from being reused after a delete.
CREATE TABLE IF NOT EXISTS books (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL CHECK (length(trim(title)) > 0),
    author      TEXT NOT NULL CHECK (length(trim(author)) > 0),
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

PRAGMA user_version = 1;
";
