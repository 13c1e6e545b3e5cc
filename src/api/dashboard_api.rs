// ==========================================
// Genco 原料溯源系统 - 驾驶舱 API
// ==========================================
// 职责: 驾驶舱聚合统计（交付汇总 + 供应商计数 + 问卷数）与操作日志查询
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::delivery_api::DeliveryApi;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionLog;
use crate::engine::delivery_filter::{DeliveryFilter, DeliverySummary};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::supplier_repo::{SupplierCounts, SupplierRepository};
use crate::repository::survey_repo::SurveyRepository;

/// 驾驶舱统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub deliveries: DeliverySummary,
    pub suppliers: SupplierCounts,
    pub submitted_surveys: i64,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    delivery_api: Arc<DeliveryApi>,
    supplier_repo: Arc<SupplierRepository>,
    survey_repo: Arc<SurveyRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl DashboardApi {
    pub fn new(
        delivery_api: Arc<DeliveryApi>,
        supplier_repo: Arc<SupplierRepository>,
        survey_repo: Arc<SurveyRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            delivery_api,
            supplier_repo,
            survey_repo,
            action_log_repo,
        }
    }

    /// 驾驶舱统计（交付汇总不做筛选）
    pub fn get_dashboard_stats(&self) -> ApiResult<DashboardStats> {
        Ok(DashboardStats {
            deliveries: self.delivery_api.get_delivery_summary(&DeliveryFilter::default())?,
            suppliers: self.supplier_repo.counts()?,
            submitted_surveys: self.survey_repo.count()?,
        })
    }

    /// 查询最近操作
    ///
    /// # 参数
    /// - limit: 1-1000
    pub fn get_recent_actions(&self, limit: i32) -> ApiResult<Vec<ActionLog>> {
        if limit <= 0 || limit > 1000 {
            return Err(ApiError::InvalidInput("limit必须在1-1000之间".to_string()));
        }

        Ok(self.action_log_repo.find_recent(limit)?)
    }

    /// 查询作用于某对象的操作历史
    pub fn list_action_logs_by_target(&self, target_id: &str) -> ApiResult<Vec<ActionLog>> {
        if target_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("对象ID不能为空".to_string()));
        }

        Ok(self.action_log_repo.find_by_target(target_id)?)
    }
}
