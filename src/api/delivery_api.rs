// ==========================================
// Genco 原料溯源系统 - 交付追踪 API
// ==========================================
// 职责: 追踪交付、评分预览、列表/详情查询、审批/拒收、汇总
// 红线: 状态转换只经由 DeliveryApprovalEngine，持久化使用 PENDING 条件更新
// 审计: 每次写操作记录 ActionLog，日志失败只告警不影响主操作
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_reader::FeedstockConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::delivery::{DeliveryRecord, NewDelivery};
use crate::domain::quality::{QualityAssessment, QualityReading};
use crate::domain::types::{DeliveryStatus, IndicatorColor, QualityTier, ReadingDomainPolicy};
use crate::engine::approval::{DeliveryApprovalEngine, DEFAULT_CERTIFICATE_PREFIX};
use crate::engine::delivery_filter::{DeliveryFilter, DeliverySummary, SupplierDirectory};
use crate::engine::quality_scoring::QualityScoringEngine;
use crate::i18n::t;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::delivery_repo::DeliveryRepository;
use crate::repository::supplier_repo::SupplierRepository;

// ==========================================
// DeliveryView - 交付列表视图
// ==========================================
/// 供 UI 消费的交付信息（记录 + 评分 + 等级）
///
/// 读数无法在当前策略下评分时 score/tier 为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryView {
    pub delivery_id: String,
    pub supplier_id: String,
    pub supplier_name: Option<String>,
    pub delivery_date: chrono::NaiveDate,
    pub volume_t: f64,
    pub location: String,
    pub quality: QualityReading,
    pub score: Option<u8>,
    pub tier: Option<QualityTier>,
    pub tier_color: Option<IndicatorColor>,
    pub tier_label: Option<String>,
    pub status: DeliveryStatus,
    pub status_label: String,
    pub certificate_ref: Option<String>,
}

// ==========================================
// DeliveryDetail - 交付详情
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDetail {
    #[serde(flatten)]
    pub delivery: DeliveryView,
    pub photos: Vec<String>,
    pub assessment: Option<QualityAssessment>,
    /// 当前状态允许的目标状态（PENDING 时显示批准/拒收按钮）
    pub allowed_transitions: Vec<DeliveryStatus>,
    pub history: Vec<ActionLog>,
}

// ==========================================
// DeliveryApi - 交付追踪 API
// ==========================================
pub struct DeliveryApi {
    delivery_repo: Arc<DeliveryRepository>,
    supplier_repo: Arc<SupplierRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn FeedstockConfigReader>,
}

impl DeliveryApi {
    /// 创建新的DeliveryApi实例
    pub fn new(
        delivery_repo: Arc<DeliveryRepository>,
        supplier_repo: Arc<SupplierRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn FeedstockConfigReader>,
    ) -> Self {
        Self {
            delivery_repo,
            supplier_repo,
            action_log_repo,
            config,
        }
    }

    // ==========================================
    // 引擎构造（每次调用读取最新配置）
    // ==========================================

    fn scoring_engine(&self) -> QualityScoringEngine {
        let policy = self.config.get_reading_domain_policy().unwrap_or_else(|e| {
            warn!(error = %e, "读取读数越界策略失败，使用 CLAMP");
            ReadingDomainPolicy::Clamp
        });
        QualityScoringEngine::new(policy)
    }

    fn approval_engine(&self) -> DeliveryApprovalEngine {
        let prefix = self.config.get_certificate_prefix().unwrap_or_else(|e| {
            warn!(error = %e, "读取证书前缀失败，使用默认值");
            DEFAULT_CERTIFICATE_PREFIX.to_string()
        });
        DeliveryApprovalEngine::new(&prefix)
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 追踪新交付（创建 PENDING 记录）
    ///
    /// # 校验
    /// - 供应商存在于目录
    /// - 交付量为正的有限数
    /// - 收集点非空
    /// - 质检读数按当前策略可评分（REJECT 策略下域外读数被拒绝）
    pub fn track_delivery(&self, input: NewDelivery, actor: &str) -> ApiResult<DeliveryView> {
        if input.supplier_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("供应商ID不能为空".to_string()));
        }
        if !input.volume_t.is_finite() || input.volume_t <= 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "交付量必须为正数: {}",
                input.volume_t
            )));
        }
        if input.location.trim().is_empty() {
            return Err(ApiError::InvalidInput("收集点不能为空".to_string()));
        }

        let supplier = self
            .supplier_repo
            .find_by_id(&input.supplier_id)?
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("供应商不存在: {}", input.supplier_id))
            })?;

        let assessment = self.scoring_engine().assess(&input.quality)?;

        let record = DeliveryRecord::new_pending(uuid::Uuid::new_v4().to_string(), input);
        self.delivery_repo.insert(&record)?;

        info!(
            delivery_id = %record.delivery_id,
            supplier_id = %record.supplier_id,
            score = assessment.score,
            tier = %assessment.tier,
            "交付已追踪"
        );

        self.write_log(ActionLog::now(
            ActionType::TrackDelivery,
            actor,
            Some(&record.delivery_id),
            Some(json!({
                "supplier_id": record.supplier_id,
                "volume_t": record.volume_t,
                "quality": record.quality,
                "score": assessment.score,
            })),
            None,
        ));

        if assessment.has_anomaly() {
            self.write_log(ActionLog::now(
                ActionType::ReadingClamped,
                actor,
                Some(&record.delivery_id),
                Some(json!({ "clamped_fields": assessment.clamped_fields })),
                Some("质检读数超出 [0,100]，评分时已截断".to_string()),
            ));
        }

        Ok(self.build_view(&record, Some(&supplier.name), Some(&assessment)))
    }

    /// 批准交付
    ///
    /// # 返回
    /// - Ok(DeliveryView): 已批准，附证书引用
    /// - Err(NotFound): 记录不存在
    /// - Err(InvalidStateTransition): 记录非 PENDING（含并发审批落败），记录不变
    pub fn approve_delivery(&self, delivery_id: &str, actor: &str) -> ApiResult<DeliveryView> {
        let mut record = self.load(delivery_id)?;
        let certificate_ref = self.approval_engine().approve(&mut record)?;

        self.delivery_repo.transition_if_pending(
            delivery_id,
            DeliveryStatus::Approved,
            Some(&certificate_ref),
        )?;

        self.write_log(ActionLog::now(
            ActionType::ApproveDelivery,
            actor,
            Some(delivery_id),
            Some(json!({ "certificate_ref": certificate_ref })),
            None,
        ));

        self.view_of(&record)
    }

    /// 拒收交付
    pub fn reject_delivery(
        &self,
        delivery_id: &str,
        actor: &str,
        reason: Option<&str>,
    ) -> ApiResult<DeliveryView> {
        let mut record = self.load(delivery_id)?;
        self.approval_engine().reject(&mut record)?;

        self.delivery_repo
            .transition_if_pending(delivery_id, DeliveryStatus::Rejected, None)?;

        self.write_log(ActionLog::now(
            ActionType::RejectDelivery,
            actor,
            Some(delivery_id),
            None,
            reason.map(|r| r.to_string()),
        ));

        self.view_of(&record)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 评分预览（追踪表单实时显示，不落库）
    pub fn assess_reading(&self, reading: &QualityReading) -> ApiResult<QualityAssessment> {
        Ok(self.scoring_engine().assess(reading)?)
    }

    /// 交付详情
    pub fn get_delivery_detail(&self, delivery_id: &str) -> ApiResult<DeliveryDetail> {
        let record = self.load(delivery_id)?;
        let directory = self.supplier_repo.name_directory()?;
        let assessment = self.scoring_engine().assess(&record.quality);

        let history = self
            .action_log_repo
            .find_by_target(delivery_id)
            .unwrap_or_else(|e| {
                warn!(error = %e, delivery_id, "查询操作日志失败");
                Vec::new()
            });

        Ok(DeliveryDetail {
            delivery: self.build_view(
                &record,
                directory.supplier_name(&record.supplier_id),
                assessment.as_ref().ok(),
            ),
            photos: record.photos.clone(),
            assessment: assessment.ok(),
            allowed_transitions: DeliveryApprovalEngine::allowed_transitions(record.status).to_vec(),
            history,
        })
    }

    /// 交付列表（检索 + 状态筛选，保持追踪顺序）
    pub fn list_deliveries(&self, filter: &DeliveryFilter) -> ApiResult<Vec<DeliveryView>> {
        let records = self.delivery_repo.list_all()?;
        let directory = self.supplier_repo.name_directory()?;
        let scoring = self.scoring_engine();

        Ok(filter
            .apply(&records, &directory)
            .into_iter()
            .map(|record| {
                let assessment = scoring.assess(&record.quality);
                self.build_view(
                    record,
                    directory.supplier_name(&record.supplier_id),
                    assessment.as_ref().ok(),
                )
            })
            .collect())
    }

    /// 交付汇总（在筛选后的集合上计算）
    pub fn get_delivery_summary(&self, filter: &DeliveryFilter) -> ApiResult<DeliverySummary> {
        let records = self.delivery_repo.list_all()?;
        let directory = self.supplier_repo.name_directory()?;
        let filtered = filter.apply(&records, &directory);
        Ok(DeliverySummary::from_records(filtered, &self.scoring_engine()))
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn load(&self, delivery_id: &str) -> ApiResult<DeliveryRecord> {
        self.delivery_repo
            .find_by_id(delivery_id)?
            .ok_or_else(|| ApiError::NotFound(format!("交付记录(id={})不存在", delivery_id)))
    }

    fn view_of(&self, record: &DeliveryRecord) -> ApiResult<DeliveryView> {
        let supplier_name = self
            .supplier_repo
            .find_by_id(&record.supplier_id)?
            .map(|s| s.name);
        let assessment = self.scoring_engine().assess(&record.quality);
        Ok(self.build_view(
            record,
            supplier_name.as_deref(),
            assessment.as_ref().ok(),
        ))
    }

    fn build_view(
        &self,
        record: &DeliveryRecord,
        supplier_name: Option<&str>,
        assessment: Option<&QualityAssessment>,
    ) -> DeliveryView {
        let tier = assessment.map(|a| a.tier);

        DeliveryView {
            delivery_id: record.delivery_id.clone(),
            supplier_id: record.supplier_id.clone(),
            supplier_name: supplier_name.map(|s| s.to_string()),
            delivery_date: record.delivery_date,
            volume_t: record.volume_t,
            location: record.location.clone(),
            quality: record.quality,
            score: assessment.map(|a| a.score),
            tier,
            tier_color: tier.map(|tier| tier.color()),
            tier_label: tier.map(|tier| t(tier.label_key())),
            status: record.status,
            status_label: t(record.status.label_key()),
            certificate_ref: record.certificate_ref.clone(),
        }
    }

    /// 写入操作日志，失败时只记录警告（不影响主要操作）
    fn write_log(&self, log: ActionLog) {
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, action_type = %log.action_type, "记录操作日志失败");
        }
    }
}
