// ==========================================
// Genco 原料溯源系统 - 领域类型定义
// ==========================================
// 交付状态 / 质量等级 / 指示颜色 / 供应商分类
// 序列化格式: 小写（与前端消费者一致）
// 存储格式: SCREAMING_SNAKE_CASE（与数据库一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 交付状态 (Delivery Status)
// ==========================================
// 状态机: PENDING -> APPROVED | REJECTED，后两者为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,  // 待审批
    Approved, // 已批准（附证书引用）
    Rejected, // 已拒收
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Approved => write!(f, "approved"),
            DeliveryStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl DeliveryStatus {
    /// 从字符串解析状态（大小写不敏感，兼容 db/前端两种写法）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(DeliveryStatus::Pending),
            "APPROVED" => Some(DeliveryStatus::Approved),
            "REJECTED" => Some(DeliveryStatus::Rejected),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Approved => "APPROVED",
            DeliveryStatus::Rejected => "REJECTED",
        }
    }

    /// 是否终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeliveryStatus::Pending)
    }

    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "status.pending",
            DeliveryStatus::Approved => "status.approved",
            DeliveryStatus::Rejected => "status.rejected",
        }
    }
}

// ==========================================
// 指示颜色 (Indicator Color)
// ==========================================
// 顺序: Green < Yellow < Red（越大越差）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorColor {
    Green,
    Yellow,
    Red,
}

impl IndicatorColor {
    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            IndicatorColor::Green => "color.green",
            IndicatorColor::Yellow => "color.yellow",
            IndicatorColor::Red => "color.red",
        }
    }
}

impl fmt::Display for IndicatorColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorColor::Green => write!(f, "green"),
            IndicatorColor::Yellow => write!(f, "yellow"),
            IndicatorColor::Red => write!(f, "red"),
        }
    }
}

// ==========================================
// 质量等级 (Quality Tier)
// ==========================================
// 依据综合分: >=90 Excellent / 80..=89 Acceptable / <80 Poor
// 顺序: Poor < Acceptable < Excellent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    Poor,
    Acceptable,
    Excellent,
}

impl QualityTier {
    /// 等级对应的展示颜色
    pub fn color(&self) -> IndicatorColor {
        match self {
            QualityTier::Excellent => IndicatorColor::Green,
            QualityTier::Acceptable => IndicatorColor::Yellow,
            QualityTier::Poor => IndicatorColor::Red,
        }
    }

    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "tier.excellent",
            QualityTier::Acceptable => "tier.acceptable",
            QualityTier::Poor => "tier.poor",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityTier::Excellent => write!(f, "Excellent"),
            QualityTier::Acceptable => write!(f, "Acceptable"),
            QualityTier::Poor => write!(f, "Poor"),
        }
    }
}

// ==========================================
// 质检字段 (Reading Field)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingField {
    Moisture,
    Purity,
    Contamination,
}

impl fmt::Display for ReadingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingField::Moisture => write!(f, "moisture"),
            ReadingField::Purity => write!(f, "purity"),
            ReadingField::Contamination => write!(f, "contamination"),
        }
    }
}

// ==========================================
// 读数域外处理策略 (Reading Domain Policy)
// ==========================================
// CLAMP: 截断到 [0,100] 并告警；REJECT: 拒绝整条读数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingDomainPolicy {
    Clamp,
    Reject,
}

impl Default for ReadingDomainPolicy {
    fn default() -> Self {
        ReadingDomainPolicy::Clamp
    }
}

impl ReadingDomainPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CLAMP" => Some(ReadingDomainPolicy::Clamp),
            "REJECT" => Some(ReadingDomainPolicy::Reject),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ReadingDomainPolicy::Clamp => "CLAMP",
            ReadingDomainPolicy::Reject => "REJECT",
        }
    }
}

// ==========================================
// 供应商类型 (Supplier Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierType {
    Supplier, // 企业供应商
    Farmer,   // 农户/合作社
}

impl SupplierType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SUPPLIER" => Some(SupplierType::Supplier),
            "FARMER" => Some(SupplierType::Farmer),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SupplierType::Supplier => "SUPPLIER",
            SupplierType::Farmer => "FARMER",
        }
    }
}

// ==========================================
// 供应商状态 (Supplier Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
    Pending, // 注册待审
}

impl SupplierStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Some(SupplierStatus::Active),
            "INACTIVE" => Some(SupplierStatus::Inactive),
            "PENDING" => Some(SupplierStatus::Pending),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "ACTIVE",
            SupplierStatus::Inactive => "INACTIVE",
            SupplierStatus::Pending => "PENDING",
        }
    }
}

// ==========================================
// 合规状态 (Compliance Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Pending,
}

impl ComplianceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "COMPLIANT" => Some(ComplianceStatus::Compliant),
            "NON_COMPLIANT" | "NON-COMPLIANT" => Some(ComplianceStatus::NonCompliant),
            "PENDING" => Some(ComplianceStatus::Pending),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "COMPLIANT",
            ComplianceStatus::NonCompliant => "NON_COMPLIANT",
            ComplianceStatus::Pending => "PENDING",
        }
    }
}

// ==========================================
// 合同状态 (Contract Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Expired,
    Pending, // 待签
}

impl ContractStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Some(ContractStatus::Active),
            "EXPIRED" => Some(ContractStatus::Expired),
            "PENDING" => Some(ContractStatus::Pending),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "ACTIVE",
            ContractStatus::Expired => "EXPIRED",
            ContractStatus::Pending => "PENDING",
        }
    }
}
