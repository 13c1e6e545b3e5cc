// ==========================================
// Genco 原料溯源系统 - 原料交付领域模型
// ==========================================
// 生命周期: 追踪创建(PENDING) -> 人工审批(APPROVED/REJECTED, 终态)
// 不变量: certificate_ref 存在 <=> status = APPROVED
// ==========================================

use crate::domain::quality::QualityReading;
use crate::domain::types::DeliveryStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DeliveryRecord - 原料交付记录
// ==========================================
// 对齐: delivery_record 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    // ===== 主键（创建后不可变）=====
    pub delivery_id: String,

    // ===== 基础信息 =====
    pub supplier_id: String,        // 供应商目录引用（不内嵌供应商数据）
    pub delivery_date: NaiveDate,   // 交付日期
    pub volume_t: f64,              // 交付量（吨，>0）
    pub quality: QualityReading,    // 质检读数
    pub location: String,           // 收集点描述
    pub photos: Vec<String>,        // 照片引用（仅展示）

    // ===== 审批状态 =====
    pub status: DeliveryStatus,
    pub certificate_ref: Option<String>, // 仅 APPROVED 时存在
}

impl DeliveryRecord {
    /// 以 PENDING 状态创建交付记录
    pub fn new_pending(delivery_id: String, input: NewDelivery) -> Self {
        Self {
            delivery_id,
            supplier_id: input.supplier_id,
            delivery_date: input.delivery_date,
            volume_t: input.volume_t,
            quality: input.quality,
            location: input.location,
            photos: input.photos,
            status: DeliveryStatus::Pending,
            certificate_ref: None,
        }
    }

    /// 证书不变量是否成立
    pub fn certificate_invariant_holds(&self) -> bool {
        (self.status == DeliveryStatus::Approved) == self.certificate_ref.is_some()
    }
}

// ==========================================
// NewDelivery - 追踪交付输入
// ==========================================
// 用途: "Track Delivery" 表单提交的数据，id 由 API 层分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelivery {
    pub supplier_id: String,
    pub delivery_date: NaiveDate,
    pub volume_t: f64,
    pub quality: QualityReading,
    pub location: String,
    #[serde(default)]
    pub photos: Vec<String>,
}
