// ==========================================
// Genco 原料溯源系统 - 供应商问卷 API
// ==========================================
// 职责: 草稿创建、完成度计算、提交（校验 + 落库 + 审计）、查询
// 红线: 仅在提交边界校验，所有违规一次返回
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde_json::json;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::survey::{StoredSurvey, SurveySubmission};
use crate::engine::survey_validator::{self, SurveyValidator};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::survey_repo::SurveyRepository;

/// 供应商引用随机段长度
const SUPPLIER_REF_LEN: usize = 9;
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// ==========================================
// SurveyApi - 问卷 API
// ==========================================
pub struct SurveyApi {
    survey_repo: Arc<SurveyRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    validator: SurveyValidator,
}

impl SurveyApi {
    pub fn new(survey_repo: Arc<SurveyRepository>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            survey_repo,
            action_log_repo,
            validator: SurveyValidator::new(),
        }
    }

    /// 创建空白草稿
    ///
    /// form_id = SUP-<毫秒时间戳>，supplier_ref = SUP-<9 位大写字母数字>
    pub fn new_draft(&self, survey_date: Option<NaiveDate>) -> SurveySubmission {
        let now = Local::now();
        SurveySubmission {
            form_id: format!("SUP-{}", now.timestamp_millis()),
            supplier_ref: generate_supplier_ref(),
            survey_date: survey_date.unwrap_or_else(|| now.date_naive()),
            basic: None,
            land: None,
            eudr: None,
            iscc: None,
            plantation: None,
            review: None,
        }
    }

    /// 草稿完成度（0-100）
    pub fn completion_percent(&self, submission: &SurveySubmission) -> f64 {
        survey_validator::completion_percent(submission)
    }

    /// 提交问卷
    ///
    /// # 返回
    /// - Ok(StoredSurvey): 已入库
    /// - Err(SurveyValidationFailed): 全部违规项，未入库
    /// - Err(InvalidInput): form_id 已提交过
    pub fn submit_survey(&self, submission: SurveySubmission, actor: &str) -> ApiResult<StoredSurvey> {
        if let Err(violations) = self.validator.validate(&submission) {
            warn!(
                form_id = %submission.form_id,
                violation_count = violations.len(),
                "问卷提交校验未通过"
            );
            return Err(ApiError::SurveyValidationFailed { violations });
        }

        let stored = StoredSurvey {
            submission,
            submitted_by: actor.to_string(),
            submitted_at: Local::now().naive_local(),
        };
        self.survey_repo.insert(&stored)?;

        let submission = &stored.submission;
        let red_flag_count = submission.red_flag_count();
        info!(
            form_id = %submission.form_id,
            supplier_ref = %submission.supplier_ref,
            red_flag_count,
            "问卷已提交"
        );

        let log = ActionLog::now(
            ActionType::SubmitSurvey,
            actor,
            Some(&submission.form_id),
            Some(json!({
                "supplier_ref": submission.supplier_ref,
                "red_flag_count": red_flag_count,
                "recommended_action": submission
                    .review
                    .as_ref()
                    .and_then(|r| r.recommended_action)
                    .map(|a| a.to_db_str()),
            })),
            None,
        );
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(stored)
    }

    /// 查询已提交问卷
    pub fn get_survey(&self, form_id: &str) -> ApiResult<StoredSurvey> {
        self.survey_repo
            .find_by_id(form_id)?
            .ok_or_else(|| ApiError::NotFound(format!("问卷(form_id={})不存在", form_id)))
    }

    /// 同一供应商引用下的问卷
    pub fn list_surveys_by_supplier(&self, supplier_ref: &str) -> ApiResult<Vec<StoredSurvey>> {
        Ok(self.survey_repo.find_by_supplier_ref(supplier_ref)?)
    }
}

/// 生成 SUP-XXXXXXXXX 形式的供应商引用（随机源为 UUID v4）
fn generate_supplier_ref() -> String {
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(4 + SUPPLIER_REF_LEN);
    out.push_str("SUP-");
    for _ in 0..SUPPLIER_REF_LEN {
        out.push(BASE36_DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_supplier_ref_format() {
        let r = generate_supplier_ref();
        assert_eq!(r.len(), 13);
        assert!(r.starts_with("SUP-"));
        assert!(r[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_ne!(generate_supplier_ref(), generate_supplier_ref());
    }
}
