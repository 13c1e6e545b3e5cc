// ==========================================
// Genco 原料溯源系统 - 供应商目录数据仓储
// ==========================================
// 职责: supplier 表的写入与查询，为交付检索提供 id -> 名称目录
// ==========================================

use crate::domain::supplier::{Coordinates, Supplier, SupplierLocation, SupplierPerformance};
use crate::domain::types::{ComplianceStatus, SupplierStatus, SupplierType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT supplier_id, name, supplier_type, email, phone,
           address, region, lat, lng, registration_date,
           status, compliance_status, reliability, quality, delivery
    FROM supplier
"#;

/// 供应商数量统计（驾驶舱）
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SupplierCounts {
    pub total: i64,
    pub suppliers: i64,
    pub farmers: i64,
    pub active: i64,
    pub pending: i64,
    pub inactive: i64,
}

// ==========================================
// SupplierRepository - 供应商仓储
// ==========================================
pub struct SupplierRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入供应商
    pub fn insert(&self, supplier: &Supplier) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let coords = supplier.location.coordinates;

        conn.execute(
            r#"
            INSERT INTO supplier (
                supplier_id, name, supplier_type, email, phone,
                address, region, lat, lng, registration_date,
                status, compliance_status, reliability, quality, delivery
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                supplier.supplier_id,
                supplier.name,
                supplier.supplier_type.to_db_str(),
                supplier.email,
                supplier.phone,
                supplier.location.address,
                supplier.location.region,
                coords.map(|c| c.lat),
                coords.map(|c| c.lng),
                supplier.registration_date.format("%Y-%m-%d").to_string(),
                supplier.status.to_db_str(),
                supplier.compliance_status.to_db_str(),
                supplier.performance.reliability,
                supplier.performance.quality,
                supplier.performance.delivery,
            ],
        )?;

        Ok(supplier.supplier_id.clone())
    }

    /// 按 supplier_id 查询
    pub fn find_by_id(&self, supplier_id: &str) -> RepositoryResult<Option<Supplier>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE supplier_id = ?1", SELECT_COLUMNS))?;
        let supplier = stmt
            .query_row(params![supplier_id], |row| Self::map_row(row))
            .optional()?;
        Ok(supplier)
    }

    /// 条件查询（按注册顺序）
    ///
    /// # 参数
    /// - `search`: 名称或邮箱的大小写不敏感子串，None/空串不过滤
    /// - `supplier_type` / `status`: 精确匹配，None 不过滤
    ///
    /// SQLite 的 lower() 只折叠 ASCII，检索词在 Rust 侧按 Unicode 两边同时折叠
    pub fn find_filtered(
        &self,
        search: Option<&str>,
        supplier_type: Option<SupplierType>,
        status: Option<SupplierStatus>,
    ) -> RepositoryResult<Vec<Supplier>> {
        let conn = self.get_conn()?;
        let term = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut stmt = conn.prepare(&format!(
            r#"{}
            WHERE (?1 IS NULL OR supplier_type = ?1)
              AND (?2 IS NULL OR status = ?2)
            ORDER BY rowid ASC
            "#,
            SELECT_COLUMNS
        ))?;

        let suppliers = stmt
            .query_map(
                params![
                    supplier_type.map(|t| t.to_db_str()),
                    status.map(|s| s.to_db_str()),
                ],
                |row| Self::map_row(row),
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(match term {
            None => suppliers,
            Some(term) => suppliers
                .into_iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&term) || s.email.to_lowercase().contains(&term)
                })
                .collect(),
        })
    }

    /// 全部供应商
    pub fn list_all(&self) -> RepositoryResult<Vec<Supplier>> {
        self.find_filtered(None, None, None)
    }

    /// id -> 名称目录（交付检索用）
    pub fn name_directory(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT supplier_id, name FROM supplier")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<SqliteResult<HashMap<_, _>>>()?;
        Ok(pairs)
    }

    /// 按类型/状态计数
    pub fn counts(&self) -> RepositoryResult<SupplierCounts> {
        let conn = self.get_conn()?;
        let counts = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(supplier_type = 'SUPPLIER'), 0),
                   COALESCE(SUM(supplier_type = 'FARMER'), 0),
                   COALESCE(SUM(status = 'ACTIVE'), 0),
                   COALESCE(SUM(status = 'PENDING'), 0),
                   COALESCE(SUM(status = 'INACTIVE'), 0)
            FROM supplier
            "#,
            [],
            |row| {
                Ok(SupplierCounts {
                    total: row.get(0)?,
                    suppliers: row.get(1)?,
                    farmers: row.get(2)?,
                    active: row.get(3)?,
                    pending: row.get(4)?,
                    inactive: row.get(5)?,
                })
            },
        )?;
        Ok(counts)
    }

    fn map_row(row: &Row) -> SqliteResult<Supplier> {
        let conversion_err = |idx: usize, msg: String| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
        };

        let type_str: String = row.get(2)?;
        let supplier_type = SupplierType::parse(&type_str)
            .ok_or_else(|| conversion_err(2, format!("未知供应商类型: {}", type_str)))?;

        let lat: Option<f64> = row.get(7)?;
        let lng: Option<f64> = row.get(8)?;
        let coordinates = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };

        let date_str: String = row.get(9)?;
        let registration_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| conversion_err(9, e.to_string()))?;

        let status_str: String = row.get(10)?;
        let status = SupplierStatus::parse(&status_str)
            .ok_or_else(|| conversion_err(10, format!("未知供应商状态: {}", status_str)))?;

        let compliance_str: String = row.get(11)?;
        let compliance_status = ComplianceStatus::parse(&compliance_str)
            .ok_or_else(|| conversion_err(11, format!("未知合规状态: {}", compliance_str)))?;

        Ok(Supplier {
            supplier_id: row.get(0)?,
            name: row.get(1)?,
            supplier_type,
            email: row.get(3)?,
            phone: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            location: SupplierLocation {
                address: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                region: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                coordinates,
            },
            registration_date,
            status,
            compliance_status,
            performance: SupplierPerformance {
                reliability: row.get(12)?,
                quality: row.get(13)?,
                delivery: row.get(14)?,
            },
        })
    }
}
