// ==========================================
// Genco 原料溯源系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎，不拼 SQL
// 红线: 引擎为纯计算，持久化与审计由 API 层编排
// ==========================================

pub mod approval;
pub mod delivery_filter;
pub mod error;
pub mod quality_scoring;
pub mod survey_validator;

// 重导出核心引擎
pub use approval::{DeliveryApprovalEngine, DEFAULT_CERTIFICATE_PREFIX};
pub use delivery_filter::{DeliveryFilter, DeliverySummary, SupplierDirectory};
pub use error::{EngineError, EngineResult};
pub use quality_scoring::{classify_tier, composite_score, field_indicators, QualityScoringEngine};
pub use survey_validator::{completion_percent, SurveySection, SurveyValidator, SurveyViolation};
