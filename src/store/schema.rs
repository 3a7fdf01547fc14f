/// Values are opaque JSON text; the table never changes shape.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;
