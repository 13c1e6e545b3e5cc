// ==========================================
// Genco 原料溯源系统 - 演示数据
// ==========================================
// 职责: 空库时写入一组演示供应商、供货合同与交付记录
// 交付状态仍经审批引擎派生，证书引用不手写
// ==========================================

use chrono::NaiveDate;
use tracing::info;

use crate::app::state::AppState;
use crate::config::FeedstockConfigReader;
use crate::domain::contract::Contract;
use crate::domain::delivery::{DeliveryRecord, NewDelivery};
use crate::domain::quality::QualityReading;
use crate::domain::supplier::{Coordinates, Supplier, SupplierLocation, SupplierPerformance};
use crate::domain::types::{ComplianceStatus, ContractStatus, SupplierStatus, SupplierType};
use crate::engine::approval::{DeliveryApprovalEngine, DEFAULT_CERTIFICATE_PREFIX};
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 写入演示数据
///
/// # 返回
/// - Ok(true): 已写入
/// - Ok(false): 库中已有供应商，跳过
pub fn seed_demo_data(state: &AppState) -> RepositoryResult<bool> {
    if state.supplier_repo.counts()?.total > 0 {
        info!("数据库已有数据，跳过演示数据写入");
        return Ok(false);
    }

    for supplier in demo_suppliers()? {
        state.supplier_repo.insert(&supplier)?;
    }
    for contract in demo_contracts()? {
        state.contract_repo.insert(&contract)?;
    }

    let prefix = state
        .config_manager
        .get_certificate_prefix()
        .unwrap_or_else(|_| DEFAULT_CERTIFICATE_PREFIX.to_string());
    let engine = DeliveryApprovalEngine::new(&prefix);

    let (f1, f2) = demo_deliveries()?;
    let mut approved = DeliveryRecord::new_pending("f1".to_string(), f1);
    engine
        .approve(&mut approved)
        .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
    state.delivery_repo.insert(&approved)?;
    state
        .delivery_repo
        .insert(&DeliveryRecord::new_pending("f2".to_string(), f2))?;

    info!(suppliers = 3, contracts = 2, deliveries = 2, "演示数据写入完成");
    Ok(true)
}

fn date(s: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::InternalError(format!("演示日期无效 {}: {}", s, e)))
}

fn demo_suppliers() -> RepositoryResult<Vec<Supplier>> {
    Ok(vec![
        Supplier {
            supplier_id: "1".to_string(),
            name: "PT. Agro Lestari".to_string(),
            supplier_type: SupplierType::Supplier,
            email: "contact@agrolestari.com".to_string(),
            phone: "+62 21 5555 1234".to_string(),
            location: SupplierLocation {
                address: "Jl. Merdeka No. 123, Jakarta".to_string(),
                region: "Jakarta".to_string(),
                coordinates: Some(Coordinates { lat: -6.2088, lng: 106.8456 }),
            },
            registration_date: date("2024-01-15")?,
            status: SupplierStatus::Active,
            compliance_status: ComplianceStatus::Compliant,
            performance: SupplierPerformance {
                reliability: 95.0,
                quality: 92.0,
                delivery: 88.0,
            },
        },
        Supplier {
            supplier_id: "2".to_string(),
            name: "Santo Farmer Group".to_string(),
            supplier_type: SupplierType::Farmer,
            email: "santo@farmercoop.id".to_string(),
            phone: "+62 361 5555 5678".to_string(),
            location: SupplierLocation {
                address: "Desa Tegal Sari, Bali".to_string(),
                region: "Bali".to_string(),
                coordinates: Some(Coordinates { lat: -8.4095, lng: 115.1889 }),
            },
            registration_date: date("2024-02-20")?,
            status: SupplierStatus::Active,
            compliance_status: ComplianceStatus::Compliant,
            performance: SupplierPerformance {
                reliability: 90.0,
                quality: 88.0,
                delivery: 92.0,
            },
        },
        Supplier {
            supplier_id: "3".to_string(),
            name: "CV. Harvest Indonesia".to_string(),
            supplier_type: SupplierType::Supplier,
            email: "info@harvestindo.com".to_string(),
            phone: "+62 22 5555 9012".to_string(),
            location: SupplierLocation {
                address: "Jl. Industri No. 45, Bandung".to_string(),
                region: "West Java".to_string(),
                coordinates: Some(Coordinates { lat: -6.9175, lng: 107.6191 }),
            },
            registration_date: date("2024-03-10")?,
            status: SupplierStatus::Pending,
            compliance_status: ComplianceStatus::Pending,
            performance: SupplierPerformance {
                reliability: 85.0,
                quality: 85.0,
                delivery: 80.0,
            },
        },
    ])
}

fn demo_contracts() -> RepositoryResult<Vec<Contract>> {
    Ok(vec![
        Contract {
            contract_id: "c1".to_string(),
            supplier_id: "1".to_string(),
            start_date: date("2024-01-01")?,
            end_date: date("2024-12-31")?,
            terms: "Monthly delivery of 10,000 tons".to_string(),
            volume_t: 120000.0,
            price: 850.0,
            status: ContractStatus::Active,
        },
        Contract {
            contract_id: "c2".to_string(),
            supplier_id: "2".to_string(),
            start_date: date("2024-02-01")?,
            end_date: date("2024-08-31")?,
            terms: "Bi-weekly delivery of 3,000 tons".to_string(),
            volume_t: 72000.0,
            price: 820.0,
            status: ContractStatus::Active,
        },
    ])
}

fn demo_deliveries() -> RepositoryResult<(NewDelivery, NewDelivery)> {
    Ok((
        NewDelivery {
            supplier_id: "1".to_string(),
            delivery_date: date("2024-11-08")?,
            volume_t: 8500.0,
            quality: QualityReading::new(12.0, 94.0, 2.0),
            location: "Jakarta Collection Point".to_string(),
            photos: vec![
                "/photos/delivery1.jpg".to_string(),
                "/photos/delivery2.jpg".to_string(),
            ],
        },
        NewDelivery {
            supplier_id: "2".to_string(),
            delivery_date: date("2024-11-07")?,
            volume_t: 3200.0,
            quality: QualityReading::new(14.0, 90.0, 3.0),
            location: "Bali Collection Point".to_string(),
            photos: vec!["/photos/delivery3.jpg".to_string()],
        },
    ))
}
