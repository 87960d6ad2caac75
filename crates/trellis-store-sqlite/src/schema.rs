//! SQL schema for the Trellis SQLite store.
//!
//! Executed on every connection open. Foreign-key enforcement is a
//! per-connection setting in SQLite, so the pragma must run each time.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows are never removed; deleted_at is stamped once and never cleared.
-- A node is restored through its node_instance log.
CREATE TABLE IF NOT EXISTS node (
    node_id     TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    deleted_at  TEXT
);

CREATE TABLE IF NOT EXISTS edge (
    edge_id     TEXT PRIMARY KEY,
    source      TEXT NOT NULL REFERENCES node(node_id),
    target      TEXT NOT NULL REFERENCES node(node_id),
    created_at  TEXT NOT NULL,
    deleted_at  TEXT,
    restored_at TEXT     -- set while a deleted edge is restored
);

CREATE INDEX IF NOT EXISTS edge_source ON edge(source);
CREATE INDEX IF NOT EXISTS edge_target ON edge(target);

-- Strictly append-only. No UPDATE or DELETE is ever issued against it.
-- seq orders a node's history; the UNIQUE index also serves node_id lookups.
CREATE TABLE IF NOT EXISTS node_instance (
    instance_id    TEXT PRIMARY KEY,
    node_id        TEXT NOT NULL REFERENCES node(node_id),
    seq            INTEGER NOT NULL,
    value          TEXT NOT NULL,      -- JSON payload, opaque to the store
    instance_type  INTEGER NOT NULL
                   CHECK (instance_type IN (0, 1, 2, 3)),  -- created | updated | deleted | restored
    recorded_at    TEXT NOT NULL,
    UNIQUE (node_id, seq)
);

PRAGMA user_version = 1;
";
