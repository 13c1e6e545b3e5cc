// ==========================================
// Genco 原料溯源系统 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - init_schema 幂等，可在每次启动时执行
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// foreign_keys 与 busy_timeout 都需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// delivery_record 上的 CHECK 约束保证:
/// status = 'APPROVED' 当且仅当 certificate_ref 非空
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id),
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS supplier (
            supplier_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            supplier_type TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            address TEXT,
            region TEXT,
            lat REAL,
            lng REAL,
            registration_date TEXT NOT NULL,
            status TEXT NOT NULL,
            compliance_status TEXT NOT NULL,
            reliability REAL NOT NULL DEFAULT 0,
            quality REAL NOT NULL DEFAULT 0,
            delivery REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS delivery_record (
            delivery_id TEXT PRIMARY KEY,
            supplier_id TEXT NOT NULL REFERENCES supplier(supplier_id),
            delivery_date TEXT NOT NULL,
            volume_t REAL NOT NULL,
            moisture_percent REAL NOT NULL,
            purity_percent REAL NOT NULL,
            contamination_percent REAL NOT NULL,
            location TEXT NOT NULL,
            photos_json TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL CHECK (status IN ('PENDING', 'APPROVED', 'REJECTED')),
            certificate_ref TEXT,
            CHECK ((status = 'APPROVED') = (certificate_ref IS NOT NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_delivery_supplier ON delivery_record(supplier_id);
        CREATE INDEX IF NOT EXISTS idx_delivery_status ON delivery_record(status);

        CREATE TABLE IF NOT EXISTS contract (
            contract_id TEXT PRIMARY KEY,
            supplier_id TEXT NOT NULL REFERENCES supplier(supplier_id),
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            terms TEXT NOT NULL,
            volume_t REAL NOT NULL,
            price REAL NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('ACTIVE', 'EXPIRED', 'PENDING')),
            CHECK (end_date >= start_date)
        );

        CREATE INDEX IF NOT EXISTS idx_contract_supplier ON contract(supplier_id);

        CREATE TABLE IF NOT EXISTS survey (
            form_id TEXT PRIMARY KEY,
            supplier_ref TEXT NOT NULL,
            supplier_name TEXT NOT NULL,
            survey_date TEXT NOT NULL,
            recommended_action TEXT,
            red_flag_count INTEGER NOT NULL DEFAULT 0,
            payload_json TEXT NOT NULL,
            submitted_by TEXT NOT NULL,
            submitted_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_survey_supplier_ref ON survey(supplier_ref);

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            target_id TEXT,
            payload_json TEXT,
            detail TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_action_log_target ON action_log(target_id);

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
