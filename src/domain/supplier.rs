// ==========================================
// Genco 原料溯源系统 - 供应商领域模型
// ==========================================
// 供应商目录归外部所有，交付记录仅按 supplier_id 引用
// ==========================================

use crate::domain::types::{ComplianceStatus, SupplierStatus, SupplierType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 经纬度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// 解析 "lat,lng" 形式的坐标字符串
    ///
    /// 超出 [-90,90] x [-180,180] 或无法解析时返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(',');
        let lat: f64 = parts.next()?.trim().parse().ok()?;
        let lng: f64 = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }
}

/// 供应商地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierLocation {
    pub address: String,
    pub region: String,
    pub coordinates: Option<Coordinates>,
}

/// 供应商绩效（0-100）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub reliability: f64,
    pub quality: f64,
    pub delivery: f64,
}

// ==========================================
// Supplier - 供应商/农户
// ==========================================
// 对齐: supplier 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String,
    pub name: String,
    pub supplier_type: SupplierType,
    pub email: String,
    pub phone: String,
    pub location: SupplierLocation,
    pub registration_date: NaiveDate,
    pub status: SupplierStatus,
    pub compliance_status: ComplianceStatus,
    pub performance: SupplierPerformance,
}

/// 供应商注册输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub supplier_type: SupplierType,
    pub email: String,
    pub phone: String,
    pub location: SupplierLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_parse() {
        let c = Coordinates::parse("-6.2088, 106.8456").unwrap();
        assert_eq!(c.lat, -6.2088);
        assert_eq!(c.lng, 106.8456);

        assert!(Coordinates::parse("").is_none());
        assert!(Coordinates::parse("abc,def").is_none());
        assert!(Coordinates::parse("91.0,10.0").is_none());
        assert!(Coordinates::parse("10.0,-181.0").is_none());
        assert!(Coordinates::parse("1,2,3").is_none());
    }
}
