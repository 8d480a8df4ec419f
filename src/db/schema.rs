/// Complete database schema for saved preferences and analysis runs.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- Key-value preferences (remembered column choices)
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);

-- Saved analyses; lines, stats and themes are JSON documents
CREATE TABLE IF NOT EXISTS analysis_runs (
    id INTEGER PRIMARY KEY,
    created_at INTEGER NOT NULL,
    lines TEXT NOT NULL,
    stats TEXT NOT NULL,
    themes TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_analysis_runs_created ON analysis_runs(created_at);
"#;
