// ==========================================
// Genco 原料溯源系统 - 供应商与种植园问卷
// ==========================================
// 六个分区: 基础信息 / 土地权属 / EUDR / ISCC / 种植园概况 / 复核提交
// 草稿阶段各分区可缺省，提交时统一校验（见 engine::survey_validator）
// 勾选/单选项一律为封闭枚举
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// 通用选项
// ==========================================

/// 是/否
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
}

/// 是/否/不确定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNoUnsure {
    Yes,
    No,
    Unsure,
}

/// 是/否/未知
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNoUnknown {
    Yes,
    No,
    Unknown,
}

// ==========================================
// 分区 1: 基础信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub supplier_name: String,
    pub contact_person: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub plantation_address: Option<String>,
    pub gps_coordinate: Option<String>, // "lat,lng"
}

// ==========================================
// 分区 2: 土地权属与合法性
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    Owned,
    Rented,
    Customary,
    Others,
}

/// 权属证明类型（印尼土地证书体系）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OwnershipProof {
    Shm,
    Hgb,
    Hgu,
    Hp,
    Girik,
    Adat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalStatus {
    Clear,
    InProcess,
    Disputed,
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Local,
    Middleman,
    Export,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandStatus {
    pub ownership_type: OwnershipType,
    #[serde(default)]
    pub proof_of_ownership: BTreeSet<OwnershipProof>,
    pub certificate_number: Option<String>,
    pub legal_status: LegalStatus,
    pub current_buyer: Option<BuyerType>,
    pub other_ownership_details: Option<String>,
    pub other_legal_status_details: Option<String>,
}

// ==========================================
// 分区 3: EUDR 合规
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalityCheck {
    LandRightsVerified,
    NoDeforestationAfter2020,
    LegalLandAcquisition,
    EnvironmentalPermitsValid,
    SocialImpactAssessment,
    FreePriorInformedConsent,
    NoCustomaryRightsConflict,
    ForestryLawCompliance,
}

/// 地块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub identifier: String,
    pub size_ha: f64,
    pub gps_coordinates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EudrCompliance {
    pub has_deforestation: YesNo,
    pub evidence_of_no_deforestation: Option<String>,
    #[serde(default)]
    pub legality_checklist: BTreeSet<LegalityCheck>,
    pub proximity_to_indigenous: YesNoUnsure,
    pub land_conflicts: YesNoUnsure,
    pub harvest_date_start: Option<NaiveDate>,
    pub harvest_date_end: Option<NaiveDate>,
    pub first_point_of_sale: Option<String>,
    #[serde(default)]
    pub plots: Vec<Plot>,
}

// ==========================================
// 分区 4: ISCC 自评
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviousLandUse {
    PrimaryForest,
    Peatland,
    Hbd, // 高生物多样性
    Hcs, // 高碳储量
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentalPractice {
    ImpactAssessment,
    WasteManagement,
    WaterConservation,
    SoilErosionPrevention,
    BiodiversityConservation,
    AgrochemicalManagement,
    EmergencyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthSafetyItem {
    PpeProvided,
    SafetyTraining,
    FirstAid,
    EvacuationProcedures,
    FireSafetyEquipment,
    ChemicalSafety,
    WorkplaceInspections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRight {
    FairWages,
    NoForcedOrChildLabor,
    FreedomOfAssociation,
    LegalWorkingHours,
    SafeWorkingConditions,
    EqualOpportunity,
    CollectiveBargaining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKeeping {
    Procurement,
    Production,
    QualityControl,
    SalesDistribution,
    Training,
    EnvironmentalMonitoring,
    ComplianceAudit,
    Traceability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsccAssessment {
    pub land_use_change: YesNoUnknown,
    #[serde(default)]
    pub previous_land_use: BTreeSet<PreviousLandUse>,
    #[serde(default)]
    pub environmental_practices: BTreeSet<EnvironmentalPractice>,
    #[serde(default)]
    pub health_safety: BTreeSet<HealthSafetyItem>,
    #[serde(default)]
    pub worker_rights: BTreeSet<WorkerRight>,
    pub grievance_mechanism: YesNo,
    pub freedom_of_association: YesNo,
    #[serde(default)]
    pub record_keeping: BTreeSet<RecordKeeping>,
    pub gap_training: YesNo,
}

// ==========================================
// 分区 5: 种植园概况
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topography {
    Flat,
    GentlySloping,
    ModeratelySloping,
    Steep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmingSystem {
    Monoculture,
    Intercropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborType {
    Family,
    Hired,
    Local,
    Migrant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadCondition {
    Paved,
    SemiPaved,
    NoRoad,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessCategory {
    Easy,
    Moderate,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FertilizerUsageType {
    Chemical,
    Organic,
    Mix,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantationProfile {
    pub main_crop_type: String,
    pub planting_year: Option<i32>,
    pub total_land_size_ha: Option<f64>,
    pub estimated_yield_t: Option<f64>,
    pub soil_type: Option<String>,
    pub topography: Option<Topography>,
    pub farming_system: Option<FarmingSystem>,
    #[serde(default)]
    pub labor_types: BTreeSet<LaborType>,
    pub permanent_workers: u32,
    pub seasonal_workers: u32,
    pub road_condition: Option<RoadCondition>,
    pub distance_km: Option<f64>,
    pub access_category: Option<AccessCategory>,
    pub fertilizer_usage_type: Option<FertilizerUsageType>,
    #[serde(default)]
    pub fertilizer_months: BTreeSet<u32>, // 1-12
    pub cost_fertilizer: Option<f64>,
    pub cost_labor: Option<f64>,
    pub cost_transport: Option<f64>,
}

// ==========================================
// 分区 6: 复核与提交
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    EvidenceOfBurning,
    ChildLabor,
    ProtectedLandEncroachment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    DoNotFollowUp,
    RequireVerification,
    DoNotEngage,
}

impl RecommendedAction {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecommendedAction::DoNotFollowUp => "DO_NOT_FOLLOW_UP",
            RecommendedAction::RequireVerification => "REQUIRE_VERIFICATION",
            RecommendedAction::DoNotEngage => "DO_NOT_ENGAGE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSection {
    pub final_notes: Option<String>,
    #[serde(default)]
    pub observed_red_flags: BTreeSet<RedFlag>,
    pub recommended_action: Option<RecommendedAction>,
    pub reason: Option<String>,
    pub declaration: bool,
    pub surveyor_signature: Option<String>,
    pub supplier_signature: Option<String>,
    pub date_verified: Option<NaiveDate>,
}

// ==========================================
// SurveySubmission - 问卷（草稿/提交共用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub form_id: String,        // SUP-<epoch millis>
    pub supplier_ref: String,   // SUP-<9 位大写字母数字>
    pub survey_date: NaiveDate,
    pub basic: Option<BasicInfo>,
    pub land: Option<LandStatus>,
    pub eudr: Option<EudrCompliance>,
    pub iscc: Option<IsccAssessment>,
    pub plantation: Option<PlantationProfile>,
    pub review: Option<ReviewSection>,
}

/// 问卷分区总数
pub const SURVEY_SECTION_COUNT: usize = 6;

impl SurveySubmission {
    /// 已填写的分区数
    pub fn filled_section_count(&self) -> usize {
        [
            self.basic.is_some(),
            self.land.is_some(),
            self.eudr.is_some(),
            self.iscc.is_some(),
            self.plantation.is_some(),
            self.review.is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count()
    }

    /// 红旗数量
    pub fn red_flag_count(&self) -> usize {
        self.review
            .as_ref()
            .map(|r| r.observed_red_flags.len())
            .unwrap_or(0)
    }
}

/// 已入库问卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSurvey {
    pub submission: SurveySubmission,
    pub submitted_by: String,
    pub submitted_at: NaiveDateTime,
}
