// ==========================================
// Genco 原料溯源系统 - 质量读数领域模型
// ==========================================
// QualityReading: 一次交付的质检读数（不可变）
// QualityAssessment: 评分引擎输出（分项分 + 综合分 + 等级）
// ==========================================

use crate::domain::types::{IndicatorColor, QualityTier, ReadingField};
use serde::{Deserialize, Serialize};

// ==========================================
// QualityReading - 质检读数
// ==========================================
// 约束: 三个字段均在 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReading {
    pub moisture_percent: f64,      // 含水率（越低越好）
    pub purity_percent: f64,        // 纯度（越高越好）
    pub contamination_percent: f64, // 杂质率（越低越好）
}

impl QualityReading {
    pub fn new(moisture_percent: f64, purity_percent: f64, contamination_percent: f64) -> Self {
        Self {
            moisture_percent,
            purity_percent,
            contamination_percent,
        }
    }

    /// 按字段取值
    pub fn value_of(&self, field: ReadingField) -> f64 {
        match field {
            ReadingField::Moisture => self.moisture_percent,
            ReadingField::Purity => self.purity_percent,
            ReadingField::Contamination => self.contamination_percent,
        }
    }

    /// 三个字段是否都在 [0, 100]
    pub fn is_within_domain(&self) -> bool {
        [
            self.moisture_percent,
            self.purity_percent,
            self.contamination_percent,
        ]
        .iter()
        .all(|v| (0.0..=100.0).contains(v))
    }
}

// ==========================================
// FieldIndicators - 分字段展示颜色
// ==========================================
// 与综合分等级是两套独立规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIndicators {
    pub moisture: IndicatorColor,
    pub purity: IndicatorColor,
    pub contamination: IndicatorColor,
}

// ==========================================
// ClampedField - 被截断的域外读数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampedField {
    pub field: ReadingField,
    pub raw_value: f64,
    pub clamped_value: f64,
}

// ==========================================
// QualityAssessment - 质量评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: u8,                  // 综合分 0-100
    pub tier: QualityTier,          // 质量等级
    pub moisture_score: f64,        // 含水率分项分
    pub purity_score: f64,          // 纯度分项分
    pub contamination_score: f64,   // 杂质率分项分
    pub indicators: FieldIndicators, // 分字段颜色（按规整后读数）
    pub clamped_fields: Vec<ClampedField>, // 域外截断记录（CLAMP 策略）
}

impl QualityAssessment {
    /// 是否发生过域外截断
    pub fn has_anomaly(&self) -> bool {
        !self.clamped_fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_within_domain() {
        assert!(QualityReading::new(0.0, 100.0, 0.0).is_within_domain());
        assert!(QualityReading::new(12.0, 94.0, 2.0).is_within_domain());
        assert!(!QualityReading::new(-0.1, 94.0, 2.0).is_within_domain());
        assert!(!QualityReading::new(1.0, 100.5, 2.0).is_within_domain());
        assert!(!QualityReading::new(1.0, 90.0, f64::NAN).is_within_domain());
    }

    #[test]
    fn test_value_of() {
        let reading = QualityReading::new(1.5, 92.0, 0.4);
        assert_eq!(reading.value_of(ReadingField::Moisture), 1.5);
        assert_eq!(reading.value_of(ReadingField::Purity), 92.0);
        assert_eq!(reading.value_of(ReadingField::Contamination), 0.4);
    }
}
