// ==========================================
// Genco 原料溯源系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod contract;
pub mod delivery;
pub mod quality;
pub mod supplier;
pub mod survey;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use contract::{Contract, NewContract};
pub use delivery::{DeliveryRecord, NewDelivery};
pub use quality::{ClampedField, FieldIndicators, QualityAssessment, QualityReading};
pub use supplier::{Coordinates, NewSupplier, Supplier, SupplierLocation, SupplierPerformance};
pub use survey::{StoredSurvey, SurveySubmission, SURVEY_SECTION_COUNT};
pub use types::{
    ComplianceStatus, ContractStatus, DeliveryStatus, IndicatorColor, QualityTier, ReadingDomainPolicy,
    ReadingField, SupplierStatus, SupplierType,
};
