// ==========================================
// Genco 原料溯源系统 - 供货合同数据仓储
// ==========================================
// 职责: contract 表的写入与按供应商查询
// 约束: supplier_id 外键指向 supplier 表
// ==========================================

use crate::domain::contract::Contract;
use crate::domain::types::ContractStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT contract_id, supplier_id, start_date, end_date,
           terms, volume_t, price, status
    FROM contract
"#;

// ==========================================
// ContractRepository - 合同仓储
// ==========================================
pub struct ContractRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ContractRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入合同
    ///
    /// 供应商不存在时返回 ForeignKeyViolation
    pub fn insert(&self, contract: &Contract) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO contract (
                contract_id, supplier_id, start_date, end_date,
                terms, volume_t, price, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                contract.contract_id,
                contract.supplier_id,
                contract.start_date.format("%Y-%m-%d").to_string(),
                contract.end_date.format("%Y-%m-%d").to_string(),
                contract.terms,
                contract.volume_t,
                contract.price,
                contract.status.to_db_str(),
            ],
        )?;

        Ok(contract.contract_id.clone())
    }

    pub fn find_by_id(&self, contract_id: &str) -> RepositoryResult<Option<Contract>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE contract_id = ?1", SELECT_COLUMNS))?;
        let contract = stmt
            .query_row(params![contract_id], |row| Self::map_row(row))
            .optional()?;
        Ok(contract)
    }

    /// 某供应商的全部合同（按登记顺序）
    pub fn find_by_supplier(&self, supplier_id: &str) -> RepositoryResult<Vec<Contract>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE supplier_id = ?1 ORDER BY rowid ASC",
            SELECT_COLUMNS
        ))?;
        let contracts = stmt
            .query_map(params![supplier_id], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(contracts)
    }

    /// 某供应商 ACTIVE 合同数
    pub fn count_active_by_supplier(&self, supplier_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM contract WHERE supplier_id = ?1 AND status = ?2",
            params![supplier_id, ContractStatus::Active.to_db_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn map_row(row: &Row) -> SqliteResult<Contract> {
        let conversion_err = |idx: usize, msg: String| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
        };
        let date_at = |idx: usize| -> SqliteResult<NaiveDate> {
            let raw: String = row.get(idx)?;
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_err(idx, e.to_string()))
        };

        let status_str: String = row.get(7)?;
        let status = ContractStatus::parse(&status_str)
            .ok_or_else(|| conversion_err(7, format!("未知合同状态: {}", status_str)))?;

        Ok(Contract {
            contract_id: row.get(0)?,
            supplier_id: row.get(1)?,
            start_date: date_at(2)?,
            end_date: date_at(3)?,
            terms: row.get(4)?,
            volume_t: row.get(5)?,
            price: row.get(6)?,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::supplier::{Supplier, SupplierLocation, SupplierPerformance};
    use crate::domain::types::{ComplianceStatus, SupplierStatus, SupplierType};
    use crate::repository::supplier_repo::SupplierRepository;

    fn setup() -> (SupplierRepository, ContractRepository) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let suppliers = SupplierRepository::new(conn.clone());
        for (id, name) in [("1", "PT. Agro Lestari"), ("2", "Santo Farmer Group")] {
            suppliers
                .insert(&Supplier {
                    supplier_id: id.to_string(),
                    name: name.to_string(),
                    supplier_type: SupplierType::Supplier,
                    email: "contact@agrolestari.com".to_string(),
                    phone: String::new(),
                    location: SupplierLocation {
                        address: "Jl. Merdeka No. 123, Jakarta".to_string(),
                        region: "Jakarta".to_string(),
                        coordinates: None,
                    },
                    registration_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    status: SupplierStatus::Active,
                    compliance_status: ComplianceStatus::Compliant,
                    performance: SupplierPerformance::default(),
                })
                .unwrap();
        }
        (suppliers, ContractRepository::new(conn))
    }

    fn contract(id: &str, supplier_id: &str, status: ContractStatus) -> Contract {
        Contract {
            contract_id: id.to_string(),
            supplier_id: supplier_id.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            terms: "Monthly delivery of 10,000 tons".to_string(),
            volume_t: 120000.0,
            price: 850.0,
            status,
        }
    }

    #[test]
    fn test_insert_and_list_by_supplier() {
        let (_suppliers, repo) = setup();
        repo.insert(&contract("c1", "1", ContractStatus::Active)).unwrap();
        repo.insert(&contract("c3", "1", ContractStatus::Expired)).unwrap();
        repo.insert(&contract("c2", "2", ContractStatus::Active)).unwrap();

        let found = repo.find_by_id("c1").unwrap().unwrap();
        assert_eq!(found, contract("c1", "1", ContractStatus::Active));
        assert!(repo.find_by_id("c9").unwrap().is_none());

        let ids: Vec<String> = repo
            .find_by_supplier("1")
            .unwrap()
            .into_iter()
            .map(|c| c.contract_id)
            .collect();
        assert_eq!(ids, vec!["c1", "c3"]);

        assert_eq!(repo.count_active_by_supplier("1").unwrap(), 1);
        assert_eq!(repo.count_active_by_supplier("2").unwrap(), 1);
        assert_eq!(repo.count_active_by_supplier("3").unwrap(), 0);
    }

    #[test]
    fn test_unknown_supplier_is_foreign_key_violation() {
        let (_suppliers, repo) = setup();
        let result = repo.insert(&contract("c1", "missing", ContractStatus::Active));
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
        assert!(repo.find_by_supplier("missing").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_id_is_unique_violation() {
        let (_suppliers, repo) = setup();
        repo.insert(&contract("c1", "1", ContractStatus::Active)).unwrap();
        let result = repo.insert(&contract("c1", "2", ContractStatus::Pending));
        assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));
    }
}
