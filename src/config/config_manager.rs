// ==========================================
// Genco 原料溯源系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)，当前仅使用 global scope
// ==========================================

use crate::config::config_reader::FeedstockConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::ReadingDomainPolicy;
use crate::engine::approval::DEFAULT_CERTIFICATE_PREFIX;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 默认界面语言
pub const DEFAULT_LOCALE: &str = "en";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON，键有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// FeedstockConfigReader Trait 实现
// ==========================================
impl FeedstockConfigReader for ConfigManager {
    fn get_reading_domain_policy(&self) -> Result<ReadingDomainPolicy, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::READING_DOMAIN_POLICY,
            ReadingDomainPolicy::Clamp.to_db_str(),
        )?;
        match ReadingDomainPolicy::parse(&value) {
            Some(policy) => Ok(policy),
            None => {
                tracing::warn!(
                    config_key = config_keys::READING_DOMAIN_POLICY,
                    value = %value,
                    "未知的读数越界策略，使用 CLAMP"
                );
                Ok(ReadingDomainPolicy::Clamp)
            }
        }
    }

    fn get_certificate_prefix(&self) -> Result<String, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::CERTIFICATE_PATH_PREFIX, DEFAULT_CERTIFICATE_PREFIX)?;
        if value.trim().is_empty() {
            tracing::warn!(
                config_key = config_keys::CERTIFICATE_PATH_PREFIX,
                "证书前缀为空，使用默认值"
            );
            return Ok(DEFAULT_CERTIFICATE_PREFIX.to_string());
        }
        Ok(value)
    }

    fn get_default_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::DEFAULT_LOCALE, DEFAULT_LOCALE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 质检读数越界策略 (CLAMP | REJECT)
    pub const READING_DOMAIN_POLICY: &str = "reading_domain_policy";

    // 证书引用前缀
    pub const CERTIFICATE_PATH_PREFIX: &str = "certificate_path_prefix";

    // 界面语言
    pub const DEFAULT_LOCALE: &str = "default_locale";
}
