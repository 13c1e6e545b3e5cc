// ==========================================
// Genco 原料溯源系统 - API 层
// ==========================================
// 职责: 提供业务用例接口，编排 engine + repository + 审计
// ==========================================

pub mod dashboard_api;
pub mod delivery_api;
pub mod error;
pub mod report_api;
pub mod supplier_api;
pub mod survey_api;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardStats};
pub use delivery_api::{DeliveryApi, DeliveryDetail, DeliveryView};
pub use error::{ApiError, ApiResult};
pub use report_api::{ReportApi, DELIVERY_CSV_HEADER};
pub use supplier_api::{SupplierApi, SupplierProfile, SupplierQuery};
pub use survey_api::SurveyApi;
