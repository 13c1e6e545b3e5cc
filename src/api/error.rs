// ==========================================
// Genco 原料溯源系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把仓储/引擎错误转换为用户可读的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::engine::survey_validator::SurveyViolation;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 非 PENDING 记录上的审批操作
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    /// REJECT 策略下的域外读数
    #[error("质检读数超出范围: field={field}, value={value}")]
    OutOfDomainReading { field: String, value: f64 },

    /// 问卷提交校验失败（全部违规项）
    #[error("问卷校验失败: {} 项违规", .violations.len())]
    SurveyValidationFailed { violations: Vec<SurveyViolation> },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("报表导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("引用的记录不存在: {}", msg))
            }
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidTransition { from, to, .. } => ApiError::InvalidStateTransition {
                from: from.to_db_str().to_string(),
                to: to.to_db_str().to_string(),
            },
            EngineError::OutOfDomainReading { field, value } => ApiError::OutOfDomainReading {
                field: field.to_string(),
                value,
            },
            EngineError::NonFiniteReading { field } => {
                ApiError::InvalidInput(format!("质检读数不是有限数值: {}", field))
            }
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
