// ==========================================
// Genco 原料溯源系统 - 操作日志领域模型
// ==========================================
// 红线: 审批、截断、注册、问卷提交均需留痕
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 对齐: action_log 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,          // 日志ID
    pub action_type: String,        // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,   // 操作时间戳
    pub actor: String,              // 操作人
    pub target_id: Option<String>,  // 作用对象（交付/供应商/问卷ID）
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,     // 详细描述
}

impl ActionLog {
    /// 以当前时间构造日志
    pub fn now(
        action_type: ActionType,
        actor: &str,
        target_id: Option<&str>,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            target_id: target_id.map(|s| s.to_string()),
            payload_json,
            detail,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    TrackDelivery,    // 追踪新交付
    ApproveDelivery,  // 批准交付
    RejectDelivery,   // 拒收交付
    ReadingClamped,   // 质检读数域外截断
    RegisterSupplier, // 注册供应商
    RegisterContract, // 登记供货合同
    SubmitSurvey,     // 提交供应商问卷
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::TrackDelivery => write!(f, "TRACK_DELIVERY"),
            ActionType::ApproveDelivery => write!(f, "APPROVE_DELIVERY"),
            ActionType::RejectDelivery => write!(f, "REJECT_DELIVERY"),
            ActionType::ReadingClamped => write!(f, "READING_CLAMPED"),
            ActionType::RegisterSupplier => write!(f, "REGISTER_SUPPLIER"),
            ActionType::RegisterContract => write!(f, "REGISTER_CONTRACT"),
            ActionType::SubmitSurvey => write!(f, "SUBMIT_SURVEY"),
        }
    }
}
