//! SQL schema for the Hush SQLite store.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version` so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT keeps ids strictly increasing, even after deletes.
CREATE TABLE IF NOT EXISTS posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    content     TEXT    NOT NULL,
    created_at  TEXT    NOT NULL,   -- RFC 3339 UTC, microsecond precision
    likes       INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
    username    TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    content     TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS polls (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question    TEXT    NOT NULL,
    option_a    TEXT    NOT NULL,
    option_b    TEXT    NOT NULL,
    votes_a     INTEGER NOT NULL DEFAULT 0 CHECK (votes_a >= 0),
    votes_b     INTEGER NOT NULL DEFAULT 0 CHECK (votes_b >= 0),
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS confessions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    content     TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);

-- Only ever read through a random single-row reveal.
CREATE TABLE IF NOT EXISTS mystery_messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    content     TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question    TEXT    NOT NULL,
    answer      TEXT,               -- NULL until answered
    created_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_created_idx    ON posts(created_at);
CREATE INDEX IF NOT EXISTS comments_post_idx    ON comments(post_id, created_at);

PRAGMA user_version = 1;
";
