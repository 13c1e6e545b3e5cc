// ==========================================
// Genco 原料溯源系统 - 原料质量评分引擎
// ==========================================
// 职责: 质检读数 -> 综合分(0-100) + 质量等级 + 分字段颜色
// 输入: QualityReading
// 输出: QualityAssessment
// ==========================================
// 红线: 权重 0.5/0.3/0.2 为固定常量，不可配置
// ==========================================

use crate::domain::quality::{ClampedField, FieldIndicators, QualityAssessment, QualityReading};
use crate::domain::types::{IndicatorColor, QualityTier, ReadingDomainPolicy, ReadingField};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, warn};

// ==========================================
// 评分常量
// ==========================================

/// 纯度权重
pub const PURITY_WEIGHT: f64 = 0.5;
/// 含水率权重
pub const MOISTURE_WEIGHT: f64 = 0.3;
/// 杂质率权重
pub const CONTAMINATION_WEIGHT: f64 = 0.2;

/// 含水率每 1% 扣分
const MOISTURE_PENALTY_PER_PERCENT: f64 = 5.0;
/// 杂质率每 1% 扣分
const CONTAMINATION_PENALTY_PER_PERCENT: f64 = 10.0;

/// Excellent 下限（含）
pub const EXCELLENT_MIN_SCORE: u8 = 90;
/// Acceptable 下限（含）
pub const ACCEPTABLE_MIN_SCORE: u8 = 80;

// ==========================================
// QualityScoringEngine - 质量评分引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScoringEngine {
    policy: ReadingDomainPolicy,
}

impl QualityScoringEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `policy`: 域外读数处理策略（CLAMP / REJECT）
    pub fn new(policy: ReadingDomainPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReadingDomainPolicy {
        self.policy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 评估一条质检读数
    ///
    /// # 返回
    /// - Ok(QualityAssessment): 综合分、等级、分项分、分字段颜色、截断记录
    /// - Err(EngineError::NonFiniteReading): 读数含 NaN/无穷大
    /// - Err(EngineError::OutOfDomainReading): REJECT 策略下读数超出 [0,100]
    pub fn assess(&self, reading: &QualityReading) -> EngineResult<QualityAssessment> {
        let (normalized, clamped_fields) = self.normalize(reading)?;

        let moisture_score = moisture_sub_score(normalized.moisture_percent);
        let purity_score = normalized.purity_percent;
        let contamination_score = contamination_sub_score(normalized.contamination_percent);

        let score = composite_score(moisture_score, purity_score, contamination_score);
        let tier = classify_tier(score);

        debug!(
            score,
            tier = %tier,
            moisture_score,
            purity_score,
            contamination_score,
            "质量评分完成"
        );

        Ok(QualityAssessment {
            score,
            tier,
            moisture_score,
            purity_score,
            contamination_score,
            indicators: field_indicators(&normalized),
            clamped_fields,
        })
    }

    /// 仅计算综合分
    pub fn score(&self, reading: &QualityReading) -> EngineResult<u8> {
        self.assess(reading).map(|a| a.score)
    }

    /// 按策略规整读数
    fn normalize(
        &self,
        reading: &QualityReading,
    ) -> EngineResult<(QualityReading, Vec<ClampedField>)> {
        let mut normalized = *reading;
        let mut clamped_fields = Vec::new();

        for field in [
            ReadingField::Moisture,
            ReadingField::Purity,
            ReadingField::Contamination,
        ] {
            let raw = reading.value_of(field);
            if !raw.is_finite() {
                return Err(EngineError::NonFiniteReading { field });
            }
            if (0.0..=100.0).contains(&raw) {
                continue;
            }

            match self.policy {
                ReadingDomainPolicy::Reject => {
                    return Err(EngineError::OutOfDomainReading { field, value: raw });
                }
                ReadingDomainPolicy::Clamp => {
                    let clamped = raw.clamp(0.0, 100.0);
                    warn!(field = %field, raw_value = raw, clamped_value = clamped, "质检读数超出范围，已截断");
                    match field {
                        ReadingField::Moisture => normalized.moisture_percent = clamped,
                        ReadingField::Purity => normalized.purity_percent = clamped,
                        ReadingField::Contamination => normalized.contamination_percent = clamped,
                    }
                    clamped_fields.push(ClampedField {
                        field,
                        raw_value: raw,
                        clamped_value: clamped,
                    });
                }
            }
        }

        Ok((normalized, clamped_fields))
    }
}

// ==========================================
// 评分规则（纯函数）
// ==========================================

/// 含水率分项分 = max(0, 100 - moisture * 5)
pub fn moisture_sub_score(moisture_percent: f64) -> f64 {
    (100.0 - moisture_percent * MOISTURE_PENALTY_PER_PERCENT).max(0.0)
}

/// 杂质率分项分 = max(0, 100 - contamination * 10)
pub fn contamination_sub_score(contamination_percent: f64) -> f64 {
    (100.0 - contamination_percent * CONTAMINATION_PENALTY_PER_PERCENT).max(0.0)
}

/// 加权综合分，四舍五入（半数向上），结果落在 [0,100]
pub fn composite_score(moisture_score: f64, purity_score: f64, contamination_score: f64) -> u8 {
    let weighted = purity_score * PURITY_WEIGHT
        + moisture_score * MOISTURE_WEIGHT
        + contamination_score * CONTAMINATION_WEIGHT;
    (weighted + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// 综合分 -> 质量等级
pub fn classify_tier(score: u8) -> QualityTier {
    if score >= EXCELLENT_MIN_SCORE {
        QualityTier::Excellent
    } else if score >= ACCEPTABLE_MIN_SCORE {
        QualityTier::Acceptable
    } else {
        QualityTier::Poor
    }
}

// ==========================================
// 分字段颜色（展示规则，与综合分等级相互独立）
// ==========================================

/// 单字段颜色
///
/// - 含水率: <=1 绿, <=1.5 黄, 否则红
/// - 纯度: >=95 绿, >=90 黄, 否则红
/// - 杂质率: <=0.3 绿, <=0.5 黄, 否则红
pub fn field_indicator(field: ReadingField, value: f64) -> IndicatorColor {
    match field {
        ReadingField::Moisture => lower_is_better(value, 1.0, 1.5),
        ReadingField::Purity => {
            if value >= 95.0 {
                IndicatorColor::Green
            } else if value >= 90.0 {
                IndicatorColor::Yellow
            } else {
                IndicatorColor::Red
            }
        }
        ReadingField::Contamination => lower_is_better(value, 0.3, 0.5),
    }
}

fn lower_is_better(value: f64, green_max: f64, yellow_max: f64) -> IndicatorColor {
    if value <= green_max {
        IndicatorColor::Green
    } else if value <= yellow_max {
        IndicatorColor::Yellow
    } else {
        IndicatorColor::Red
    }
}

/// 三个字段的颜色
pub fn field_indicators(reading: &QualityReading) -> FieldIndicators {
    FieldIndicators {
        moisture: field_indicator(ReadingField::Moisture, reading.moisture_percent),
        purity: field_indicator(ReadingField::Purity, reading.purity_percent),
        contamination: field_indicator(ReadingField::Contamination, reading.contamination_percent),
    }
}
