// ==========================================
// Genco 原料溯源系统 - 问卷提交校验
// ==========================================
// 职责: 在提交边界统一校验问卷，一次性返回全部违规项
// 草稿保存不经过本校验
// ==========================================

use crate::domain::supplier::Coordinates;
use crate::domain::survey::{
    BasicInfo, EudrCompliance, PlantationProfile, RecommendedAction, ReviewSection,
    SurveySubmission, SURVEY_SECTION_COUNT,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// 问卷分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveySection {
    Basic,
    Land,
    Eudr,
    Iscc,
    Plantation,
    Review,
}

/// 单条违规
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyViolation {
    pub section: SurveySection,
    pub field: String,
    pub message: String,
}

impl SurveyViolation {
    fn new(section: SurveySection, field: &str, message: &str) -> Self {
        Self {
            section,
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// 完成度百分比 = 已填分区 / 6 * 100
pub fn completion_percent(submission: &SurveySubmission) -> f64 {
    submission.filled_section_count() as f64 / SURVEY_SECTION_COUNT as f64 * 100.0
}

// ==========================================
// SurveyValidator - 提交校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyValidator;

impl SurveyValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验待提交问卷
    ///
    /// # 返回
    /// - Ok(()): 可提交
    /// - Err(violations): 全部违规项（按分区顺序）
    pub fn validate(&self, submission: &SurveySubmission) -> Result<(), Vec<SurveyViolation>> {
        let mut violations = Vec::new();

        match &submission.basic {
            Some(basic) => check_basic(basic, &mut violations),
            None => violations.push(missing(SurveySection::Basic)),
        }
        if submission.land.is_none() {
            violations.push(missing(SurveySection::Land));
        }
        match &submission.eudr {
            Some(eudr) => check_eudr(eudr, &mut violations),
            None => violations.push(missing(SurveySection::Eudr)),
        }
        if submission.iscc.is_none() {
            violations.push(missing(SurveySection::Iscc));
        }
        match &submission.plantation {
            Some(plantation) => {
                check_plantation(plantation, submission.survey_date.year(), &mut violations)
            }
            None => violations.push(missing(SurveySection::Plantation)),
        }
        match &submission.review {
            Some(review) => check_review(review, &mut violations),
            None => violations.push(missing(SurveySection::Review)),
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn missing(section: SurveySection) -> SurveyViolation {
    SurveyViolation::new(section, "*", "分区未填写")
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_basic(basic: &BasicInfo, out: &mut Vec<SurveyViolation>) {
    if is_blank(&basic.supplier_name) {
        out.push(SurveyViolation::new(SurveySection::Basic, "supplier_name", "供应商名称不能为空"));
    }
    if is_blank(&basic.contact_person) {
        out.push(SurveyViolation::new(SurveySection::Basic, "contact_person", "联系人不能为空"));
    }
    if let Some(email) = basic.email.as_deref() {
        if !is_blank(email) && !email.contains('@') {
            out.push(SurveyViolation::new(SurveySection::Basic, "email", "邮箱格式错误"));
        }
    }
    if let Some(gps) = basic.gps_coordinate.as_deref() {
        if !is_blank(gps) && Coordinates::parse(gps).is_none() {
            out.push(SurveyViolation::new(SurveySection::Basic, "gps_coordinate", "坐标需为 lat,lng 且在有效范围内"));
        }
    }
}

fn check_eudr(eudr: &EudrCompliance, out: &mut Vec<SurveyViolation>) {
    if eudr.plots.is_empty() {
        out.push(SurveyViolation::new(SurveySection::Eudr, "plots", "至少需要一个地块"));
    }
    for (idx, plot) in eudr.plots.iter().enumerate() {
        if is_blank(&plot.identifier) {
            out.push(SurveyViolation::new(
                SurveySection::Eudr,
                &format!("plots[{}].identifier", idx),
                "地块编号不能为空",
            ));
        }
        if !plot.size_ha.is_finite() || plot.size_ha <= 0.0 {
            out.push(SurveyViolation::new(
                SurveySection::Eudr,
                &format!("plots[{}].size_ha", idx),
                "地块面积必须大于 0",
            ));
        }
    }
    if let (Some(start), Some(end)) = (eudr.harvest_date_start, eudr.harvest_date_end) {
        if start > end {
            out.push(SurveyViolation::new(SurveySection::Eudr, "harvest_date_end", "采收结束日期早于开始日期"));
        }
    }
}

fn check_plantation(plantation: &PlantationProfile, survey_year: i32, out: &mut Vec<SurveyViolation>) {
    if let Some(year) = plantation.planting_year {
        if year > survey_year {
            out.push(SurveyViolation::new(SurveySection::Plantation, "planting_year", "种植年份晚于调查年份"));
        }
    }
    if plantation.fertilizer_months.iter().any(|m| !(1..=12).contains(m)) {
        out.push(SurveyViolation::new(SurveySection::Plantation, "fertilizer_months", "月份必须在 1-12"));
    }

    let non_negative = [
        ("total_land_size_ha", plantation.total_land_size_ha),
        ("estimated_yield_t", plantation.estimated_yield_t),
        ("distance_km", plantation.distance_km),
        ("cost_fertilizer", plantation.cost_fertilizer),
        ("cost_labor", plantation.cost_labor),
        ("cost_transport", plantation.cost_transport),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                out.push(SurveyViolation::new(SurveySection::Plantation, field, "数值不能为负"));
            }
        }
    }
}

fn check_review(review: &ReviewSection, out: &mut Vec<SurveyViolation>) {
    if !review.declaration {
        out.push(SurveyViolation::new(SurveySection::Review, "declaration", "必须确认声明"));
    }
    match review.recommended_action {
        None => out.push(SurveyViolation::new(SurveySection::Review, "recommended_action", "必须选择后续行动")),
        Some(RecommendedAction::DoNotFollowUp) => {}
        Some(_) => {
            if review.reason.as_deref().map_or(true, is_blank) {
                out.push(SurveyViolation::new(SurveySection::Review, "reason", "该后续行动需要填写原因"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn complete_submission() -> SurveySubmission {
        SurveySubmission {
            form_id: "SUP-1731050000000".to_string(),
            supplier_ref: "SUP-AB12CD34E".to_string(),
            survey_date: NaiveDate::from_ymd_opt(2024, 11, 8).unwrap(),
            basic: Some(BasicInfo {
                supplier_name: "Santo Farmer Group".to_string(),
                contact_person: "Santo".to_string(),
                phone_number: Some("+62 361 5555 5678".to_string()),
                email: Some("santo@farmercoop.id".to_string()),
                plantation_address: Some("Desa Tegal Sari, Bali".to_string()),
                gps_coordinate: Some("-8.4095,115.1889".to_string()),
            }),
            land: Some(LandStatus {
                ownership_type: OwnershipType::Owned,
                proof_of_ownership: [OwnershipProof::Shm].into_iter().collect(),
                certificate_number: Some("SHM-123".to_string()),
                legal_status: LegalStatus::Clear,
                current_buyer: Some(BuyerType::Local),
                other_ownership_details: None,
                other_legal_status_details: None,
            }),
            eudr: Some(EudrCompliance {
                has_deforestation: YesNo::No,
                evidence_of_no_deforestation: Some("Satellite imagery 2020-2024".to_string()),
                legality_checklist: [LegalityCheck::LandRightsVerified, LegalityCheck::NoDeforestationAfter2020]
                    .into_iter()
                    .collect(),
                proximity_to_indigenous: YesNoUnsure::No,
                land_conflicts: YesNoUnsure::No,
                harvest_date_start: NaiveDate::from_ymd_opt(2024, 3, 1),
                harvest_date_end: NaiveDate::from_ymd_opt(2024, 6, 30),
                first_point_of_sale: Some("Bali Collection Point".to_string()),
                plots: vec![Plot {
                    identifier: "Plot 1".to_string(),
                    size_ha: 2.5,
                    gps_coordinates: None,
                }],
            }),
            iscc: Some(IsccAssessment {
                land_use_change: YesNoUnknown::No,
                previous_land_use: BTreeSet::new(),
                environmental_practices: [EnvironmentalPractice::WasteManagement].into_iter().collect(),
                health_safety: [HealthSafetyItem::PpeProvided].into_iter().collect(),
                worker_rights: [WorkerRight::FairWages].into_iter().collect(),
                grievance_mechanism: YesNo::Yes,
                freedom_of_association: YesNo::Yes,
                record_keeping: [RecordKeeping::Traceability].into_iter().collect(),
                gap_training: YesNo::No,
            }),
            plantation: Some(PlantationProfile {
                main_crop_type: "Coconut".to_string(),
                planting_year: Some(2010),
                total_land_size_ha: Some(2.5),
                estimated_yield_t: Some(12.0),
                soil_type: None,
                topography: Some(Topography::Flat),
                farming_system: Some(FarmingSystem::Intercropped),
                labor_types: [LaborType::Family].into_iter().collect(),
                permanent_workers: 2,
                seasonal_workers: 4,
                road_condition: Some(RoadCondition::SemiPaved),
                distance_km: Some(14.0),
                access_category: Some(AccessCategory::Moderate),
                fertilizer_usage_type: Some(FertilizerUsageType::Organic),
                fertilizer_months: [3, 9].into_iter().collect(),
                cost_fertilizer: Some(150.0),
                cost_labor: Some(300.0),
                cost_transport: Some(80.0),
            }),
            review: Some(ReviewSection {
                final_notes: None,
                observed_red_flags: BTreeSet::new(),
                recommended_action: Some(RecommendedAction::DoNotFollowUp),
                reason: None,
                declaration: true,
                surveyor_signature: Some("Surveyor A".to_string()),
                supplier_signature: Some("Santo".to_string()),
                date_verified: NaiveDate::from_ymd_opt(2024, 11, 8),
            }),
        }
    }

    fn fields(violations: &[SurveyViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_complete_submission_passes() {
        let submission = complete_submission();
        assert!(SurveyValidator::new().validate(&submission).is_ok());
        assert_eq!(completion_percent(&submission), 100.0);
    }

    #[test]
    fn test_missing_sections_reported() {
        let mut submission = complete_submission();
        submission.land = None;
        submission.iscc = None;

        let violations = SurveyValidator::new().validate(&submission).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].section, SurveySection::Land);
        assert_eq!(violations[1].section, SurveySection::Iscc);
        assert!((completion_percent(&submission) - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_declaration_and_reason_required() {
        let mut submission = complete_submission();
        if let Some(review) = submission.review.as_mut() {
            review.declaration = false;
            review.recommended_action = Some(RecommendedAction::RequireVerification);
            review.reason = Some("  ".to_string());
        }

        let violations = SurveyValidator::new().validate(&submission).unwrap_err();
        assert_eq!(fields(&violations), vec!["declaration", "reason"]);
    }

    #[test]
    fn test_reversed_harvest_window_and_bad_plot() {
        let mut submission = complete_submission();
        if let Some(eudr) = submission.eudr.as_mut() {
            eudr.harvest_date_start = NaiveDate::from_ymd_opt(2024, 7, 1);
            eudr.harvest_date_end = NaiveDate::from_ymd_opt(2024, 6, 1);
            eudr.plots.push(Plot {
                identifier: "".to_string(),
                size_ha: 0.0,
                gps_coordinates: None,
            });
        }

        let violations = SurveyValidator::new().validate(&submission).unwrap_err();
        assert_eq!(
            fields(&violations),
            vec!["plots[1].identifier", "plots[1].size_ha", "harvest_date_end"]
        );
    }

    #[test]
    fn test_basic_contact_checks() {
        let mut submission = complete_submission();
        if let Some(basic) = submission.basic.as_mut() {
            basic.email = Some("not-an-email".to_string());
            basic.gps_coordinate = Some("200,10".to_string());
            basic.contact_person = String::new();
        }

        let violations = SurveyValidator::new().validate(&submission).unwrap_err();
        assert_eq!(fields(&violations), vec!["contact_person", "email", "gps_coordinate"]);
    }

    #[test]
    fn test_plantation_numbers() {
        let mut submission = complete_submission();
        if let Some(p) = submission.plantation.as_mut() {
            p.planting_year = Some(2030);
            p.fertilizer_months.insert(13);
            p.cost_labor = Some(-1.0);
        }

        let violations = SurveyValidator::new().validate(&submission).unwrap_err();
        assert_eq!(
            fields(&violations),
            vec!["planting_year", "fertilizer_months", "cost_labor"]
        );
    }

    #[test]
    fn test_empty_draft_completion_zero() {
        let mut submission = complete_submission();
        submission.basic = None;
        submission.land = None;
        submission.eudr = None;
        submission.iscc = None;
        submission.plantation = None;
        submission.review = None;
        assert_eq!(completion_percent(&submission), 0.0);
        assert_eq!(SurveyValidator::new().validate(&submission).unwrap_err().len(), 6);
    }
}
