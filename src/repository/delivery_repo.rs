// ==========================================
// Genco 原料溯源系统 - 交付记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑，状态转换规则归 engine::approval
// 并发: 转换使用条件更新 (status = 'PENDING')，同一记录并发审批只有一个成功
// ==========================================

use crate::domain::delivery::DeliveryRecord;
use crate::domain::quality::QualityReading;
use crate::domain::types::DeliveryStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT delivery_id, supplier_id, delivery_date, volume_t,
           moisture_percent, purity_percent, contamination_percent,
           location, photos_json, status, certificate_ref
    FROM delivery_record
"#;

// ==========================================
// DeliveryRepository - 交付记录仓储
// ==========================================
pub struct DeliveryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeliveryRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入交付记录
    ///
    /// # 返回
    /// - Ok(delivery_id)
    /// - Err(ForeignKeyViolation): supplier_id 不在供应商目录中
    /// - Err(UniqueConstraintViolation): delivery_id 重复
    pub fn insert(&self, record: &DeliveryRecord) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let photos_json = serde_json::to_string(&record.photos)?;

        conn.execute(
            r#"
            INSERT INTO delivery_record (
                delivery_id, supplier_id, delivery_date, volume_t,
                moisture_percent, purity_percent, contamination_percent,
                location, photos_json, status, certificate_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.delivery_id,
                record.supplier_id,
                record.delivery_date.format("%Y-%m-%d").to_string(),
                record.volume_t,
                record.quality.moisture_percent,
                record.quality.purity_percent,
                record.quality.contamination_percent,
                record.location,
                photos_json,
                record.status.to_db_str(),
                record.certificate_ref,
            ],
        )?;

        Ok(record.delivery_id.clone())
    }

    /// 条件转换：仅当记录仍为 PENDING 时写入新状态
    ///
    /// # 参数
    /// - `to`: 目标状态（APPROVED / REJECTED）
    /// - `certificate_ref`: APPROVED 时为证书引用，REJECTED 时为 None
    ///
    /// # 返回
    /// - Ok(()): 已写入
    /// - Err(NotFound): 记录不存在
    /// - Err(InvalidStateTransition): 记录已不是 PENDING（含并发审批中落败的一方）
    pub fn transition_if_pending(
        &self,
        delivery_id: &str,
        to: DeliveryStatus,
        certificate_ref: Option<&str>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let rows = conn.execute(
            r#"
            UPDATE delivery_record
            SET status = ?1, certificate_ref = ?2
            WHERE delivery_id = ?3 AND status = 'PENDING'
            "#,
            params![to.to_db_str(), certificate_ref, delivery_id],
        )?;

        if rows == 1 {
            return Ok(());
        }

        let current: Option<String> = conn
            .query_row(
                "SELECT status FROM delivery_record WHERE delivery_id = ?1",
                params![delivery_id],
                |row| row.get(0),
            )
            .optional()?;

        match current {
            None => Err(RepositoryError::NotFound {
                entity: "DeliveryRecord".to_string(),
                id: delivery_id.to_string(),
            }),
            Some(from) => Err(RepositoryError::InvalidStateTransition {
                from,
                to: to.to_db_str().to_string(),
            }),
        }
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 delivery_id 查询
    pub fn find_by_id(&self, delivery_id: &str) -> RepositoryResult<Option<DeliveryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE delivery_id = ?1", SELECT_COLUMNS))?;

        let record = stmt
            .query_row(params![delivery_id], |row| Self::map_row(row))
            .optional()?;
        Ok(record)
    }

    /// 全部交付记录（按追踪顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<DeliveryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY rowid ASC", SELECT_COLUMNS))?;

        let records = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 指定供应商的交付记录（按追踪顺序）
    pub fn find_by_supplier(&self, supplier_id: &str) -> RepositoryResult<Vec<DeliveryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE supplier_id = ?1 ORDER BY rowid ASC",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![supplier_id], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM delivery_record", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn map_row(row: &Row) -> SqliteResult<DeliveryRecord> {
        let date_str: String = row.get(2)?;
        let delivery_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let photos_json: String = row.get(8)?;
        let photos: Vec<String> = serde_json::from_str(&photos_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let status_str: String = row.get(9)?;
        let status = DeliveryStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                9,
                rusqlite::types::Type::Text,
                format!("未知交付状态: {}", status_str).into(),
            )
        })?;

        Ok(DeliveryRecord {
            delivery_id: row.get(0)?,
            supplier_id: row.get(1)?,
            delivery_date,
            volume_t: row.get(3)?,
            quality: QualityReading::new(row.get(4)?, row.get(5)?, row.get(6)?),
            location: row.get(7)?,
            photos,
            status,
            certificate_ref: row.get(10)?,
        })
    }
}
