/// DuckDB initialization SQL.
///
/// Executed once at open time via `Connection::execute_batch`. Every
/// statement uses `IF NOT EXISTS`, so re-running it on startup is a no-op.
///
/// Column layout mirrors `migrations/` for Postgres so both backends accept
/// the same statements from `authit-core`. DuckDB has no `BIGSERIAL`; the
/// visit id comes from a sequence instead.
pub const INIT_SQL: &str = r#"SET threads = 2;

CREATE TABLE IF NOT EXISTS leads (
    email           VARCHAR PRIMARY KEY,
    name            VARCHAR,
    phone           VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE SEQUENCE IF NOT EXISTS page_visits_id_seq START 1;

CREATE TABLE IF NOT EXISTS page_visits (
    id                  BIGINT PRIMARY KEY DEFAULT nextval('page_visits_id_seq'),
    ip_address          VARCHAR NOT NULL,
    country             VARCHAR NOT NULL,
    city                VARCHAR NOT NULL,
    page_path           VARCHAR NOT NULL,
    duration_seconds    BIGINT NOT NULL CHECK (duration_seconds >= 0),
    user_agent          VARCHAR,
    created_at          TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;
