//! SQLite schema definition.

/// Complete database schema for ward-rounds.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

-- The full record is stored as JSON; the scalar columns mirror fields that
-- are useful for inspection and ordering.
CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,                    -- registration order
    name TEXT NOT NULL,
    last_rollover_date TEXT,                      -- YYYY-MM-DD
    record TEXT NOT NULL,                         -- JSON patient record
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_position ON patients(position);
"#;
