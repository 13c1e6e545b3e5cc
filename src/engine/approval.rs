// ==========================================
// Genco 原料溯源系统 - 交付审批状态机
// ==========================================
// 状态: PENDING(初始) -> APPROVED(终态, 附证书引用) | REJECTED(终态)
// 红线: 终态不可再转换；非法转换不修改记录
// 证书引用由 delivery_id 确定性派生，引擎不生成证书内容
// ==========================================

use crate::domain::delivery::DeliveryRecord;
use crate::domain::types::DeliveryStatus;
use crate::engine::error::{EngineError, EngineResult};
use tracing::info;

/// 默认证书路径前缀
pub const DEFAULT_CERTIFICATE_PREFIX: &str = "/certificates/";

/// 证书文件扩展名
const CERTIFICATE_EXT: &str = ".pdf";

// ==========================================
// DeliveryApprovalEngine - 审批状态机
// ==========================================
#[derive(Debug, Clone)]
pub struct DeliveryApprovalEngine {
    certificate_prefix: String,
}

impl Default for DeliveryApprovalEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CERTIFICATE_PREFIX)
    }
}

impl DeliveryApprovalEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `certificate_prefix`: 证书引用前缀（如 "/certificates/"）
    pub fn new(certificate_prefix: &str) -> Self {
        Self {
            certificate_prefix: certificate_prefix.to_string(),
        }
    }

    /// 派生证书引用（同一 id 恒得同一引用）
    pub fn certificate_ref_for(&self, delivery_id: &str) -> String {
        format!("{}{}{}", self.certificate_prefix, delivery_id, CERTIFICATE_EXT)
    }

    /// 某状态下允许的目标状态
    pub fn allowed_transitions(status: DeliveryStatus) -> &'static [DeliveryStatus] {
        match status {
            DeliveryStatus::Pending => &[DeliveryStatus::Approved, DeliveryStatus::Rejected],
            DeliveryStatus::Approved | DeliveryStatus::Rejected => &[],
        }
    }

    /// 检查转换前置条件（不修改记录）
    pub fn check_transition(
        &self,
        record: &DeliveryRecord,
        to: DeliveryStatus,
    ) -> EngineResult<()> {
        if Self::allowed_transitions(record.status).contains(&to) {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                delivery_id: record.delivery_id.clone(),
                from: record.status,
                to,
            })
        }
    }

    // ==========================================
    // 转换操作
    // ==========================================

    /// 批准交付
    ///
    /// # 返回
    /// - Ok(certificate_ref): 记录已转为 APPROVED 并附证书引用
    /// - Err(EngineError::InvalidTransition): 记录非 PENDING，保持不变
    pub fn approve(&self, record: &mut DeliveryRecord) -> EngineResult<String> {
        self.check_transition(record, DeliveryStatus::Approved)?;

        let certificate_ref = self.certificate_ref_for(&record.delivery_id);
        record.status = DeliveryStatus::Approved;
        record.certificate_ref = Some(certificate_ref.clone());

        info!(delivery_id = %record.delivery_id, certificate_ref = %certificate_ref, "交付已批准");
        Ok(certificate_ref)
    }

    /// 拒收交付
    ///
    /// # 返回
    /// - Ok(()): 记录已转为 REJECTED
    /// - Err(EngineError::InvalidTransition): 记录非 PENDING，保持不变
    pub fn reject(&self, record: &mut DeliveryRecord) -> EngineResult<()> {
        self.check_transition(record, DeliveryStatus::Rejected)?;

        record.status = DeliveryStatus::Rejected;
        record.certificate_ref = None;

        info!(delivery_id = %record.delivery_id, "交付已拒收");
        Ok(())
    }
}
