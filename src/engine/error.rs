// ==========================================
// Genco 原料溯源系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::{DeliveryStatus, ReadingField};
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 非 PENDING 记录上的审批操作，记录保持不变
    #[error("无效的状态转换: delivery_id={delivery_id}, from={from} to={to}")]
    InvalidTransition {
        delivery_id: String,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    /// 读数超出 [0,100]（REJECT 策略）
    #[error("质检读数超出范围: field={field}, value={value}")]
    OutOfDomainReading { field: ReadingField, value: f64 },

    /// NaN / 无穷大，任何策略下都不接受
    #[error("质检读数不是有限数值: field={field}")]
    NonFiniteReading { field: ReadingField },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
