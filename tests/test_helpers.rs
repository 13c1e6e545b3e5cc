// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::error::Error;

use chrono::NaiveDate;
use genco_feedstock::app::AppState;
use genco_feedstock::domain::supplier::{Coordinates, NewSupplier, SupplierLocation};
use genco_feedstock::domain::survey::*;
use genco_feedstock::domain::types::SupplierType;
use genco_feedstock::domain::{NewDelivery, QualityReading};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = genco_feedstock::db::open_sqlite_connection(&db_path)?;
    genco_feedstock::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 基于临时数据库文件创建 AppState
pub fn create_test_state() -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    (temp_file, state)
}

/// 注册一个测试供应商，返回 supplier_id
pub fn register_supplier(state: &AppState, name: &str, email: &str, supplier_type: SupplierType) -> String {
    state
        .supplier_api
        .register_supplier(
            NewSupplier {
                name: name.to_string(),
                supplier_type,
                email: email.to_string(),
                phone: "+62 21 5555 0000".to_string(),
                location: SupplierLocation {
                    address: "Jl. Test No. 1".to_string(),
                    region: "Jakarta".to_string(),
                    coordinates: Some(Coordinates { lat: -6.2, lng: 106.8 }),
                },
            },
            "tester",
        )
        .unwrap()
        .supplier_id
}

/// 构造交付输入
pub fn new_delivery(supplier_id: &str, location: &str, volume_t: f64, reading: QualityReading) -> NewDelivery {
    NewDelivery {
        supplier_id: supplier_id.to_string(),
        delivery_date: NaiveDate::from_ymd_opt(2024, 11, 8).unwrap(),
        volume_t,
        quality: reading,
        location: location.to_string(),
        photos: vec!["/photos/test.jpg".to_string()],
    }
}

/// 六个分区齐全、可通过提交校验的问卷
pub fn complete_survey(form_id: &str, supplier_ref: &str) -> SurveySubmission {
    SurveySubmission {
        form_id: form_id.to_string(),
        supplier_ref: supplier_ref.to_string(),
        survey_date: NaiveDate::from_ymd_opt(2024, 11, 8).unwrap(),
        basic: Some(BasicInfo {
            supplier_name: "Santo Farmer Group".to_string(),
            contact_person: "Santo".to_string(),
            phone_number: Some("+62 361 5555 5678".to_string()),
            email: Some("santo@farmercoop.id".to_string()),
            plantation_address: Some("Desa Tegal Sari, Bali".to_string()),
            gps_coordinate: Some("-8.4095,115.1889".to_string()),
        }),
        land: Some(LandStatus {
            ownership_type: OwnershipType::Owned,
            proof_of_ownership: [OwnershipProof::Shm].into_iter().collect(),
            certificate_number: Some("SHM-123".to_string()),
            legal_status: LegalStatus::Clear,
            current_buyer: Some(BuyerType::Local),
            other_ownership_details: None,
            other_legal_status_details: None,
        }),
        eudr: Some(EudrCompliance {
            has_deforestation: YesNo::No,
            evidence_of_no_deforestation: None,
            legality_checklist: [LegalityCheck::LandRightsVerified].into_iter().collect(),
            proximity_to_indigenous: YesNoUnsure::No,
            land_conflicts: YesNoUnsure::Unsure,
            harvest_date_start: NaiveDate::from_ymd_opt(2024, 3, 1),
            harvest_date_end: NaiveDate::from_ymd_opt(2024, 6, 30),
            first_point_of_sale: None,
            plots: vec![Plot {
                identifier: "Plot 1".to_string(),
                size_ha: 2.5,
                gps_coordinates: Some("-8.41,115.19".to_string()),
            }],
        }),
        iscc: Some(IsccAssessment {
            land_use_change: YesNoUnknown::Unknown,
            previous_land_use: BTreeSet::new(),
            environmental_practices: [EnvironmentalPractice::WasteManagement].into_iter().collect(),
            health_safety: [HealthSafetyItem::PpeProvided].into_iter().collect(),
            worker_rights: [WorkerRight::FairWages].into_iter().collect(),
            grievance_mechanism: YesNo::Yes,
            freedom_of_association: YesNo::Yes,
            record_keeping: [RecordKeeping::Traceability].into_iter().collect(),
            gap_training: YesNo::No,
        }),
        plantation: Some(PlantationProfile {
            main_crop_type: "Coconut".to_string(),
            planting_year: Some(2010),
            total_land_size_ha: Some(2.5),
            estimated_yield_t: Some(12.0),
            soil_type: Some("Loam".to_string()),
            topography: Some(Topography::Flat),
            farming_system: Some(FarmingSystem::Intercropped),
            labor_types: [LaborType::Family].into_iter().collect(),
            permanent_workers: 2,
            seasonal_workers: 4,
            road_condition: Some(RoadCondition::SemiPaved),
            distance_km: Some(14.0),
            access_category: Some(AccessCategory::Moderate),
            fertilizer_usage_type: Some(FertilizerUsageType::Organic),
            fertilizer_months: [3, 9].into_iter().collect(),
            cost_fertilizer: Some(150.0),
            cost_labor: Some(300.0),
            cost_transport: Some(80.0),
        }),
        review: Some(ReviewSection {
            final_notes: None,
            observed_red_flags: BTreeSet::new(),
            recommended_action: Some(RecommendedAction::RequireVerification),
            reason: Some("Verify land certificate with the village office".to_string()),
            declaration: true,
            surveyor_signature: Some("Surveyor A".to_string()),
            supplier_signature: Some("Santo".to_string()),
            date_verified: NaiveDate::from_ymd_opt(2024, 11, 8),
        }),
    }
}
