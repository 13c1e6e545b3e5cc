// ==========================================
// Genco 原料溯源系统 - 问卷数据仓储
// ==========================================
// 存储: 完整问卷以 JSON 存入 payload_json，检索列单独冗余
// 红线: 仅存储已通过校验的提交，草稿不落库
// ==========================================

use crate::domain::survey::{StoredSurvey, SurveySubmission};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub struct SurveyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SurveyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入已提交问卷
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): form_id 已提交过
    pub fn insert(&self, survey: &StoredSurvey) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let submission = &survey.submission;
        let payload_json = serde_json::to_string(submission)?;
        let supplier_name = submission
            .basic
            .as_ref()
            .map(|b| b.supplier_name.clone())
            .unwrap_or_default();
        let recommended_action = submission
            .review
            .as_ref()
            .and_then(|r| r.recommended_action)
            .map(|a| a.to_db_str());

        conn.execute(
            r#"
            INSERT INTO survey (
                form_id, supplier_ref, supplier_name, survey_date,
                recommended_action, red_flag_count, payload_json,
                submitted_by, submitted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                submission.form_id,
                submission.supplier_ref,
                supplier_name,
                submission.survey_date.format("%Y-%m-%d").to_string(),
                recommended_action,
                submission.red_flag_count() as i64,
                payload_json,
                survey.submitted_by,
                survey.submitted_at.format(TS_FORMAT).to_string(),
            ],
        )?;

        Ok(submission.form_id.clone())
    }

    /// 按 form_id 查询
    pub fn find_by_id(&self, form_id: &str) -> RepositoryResult<Option<StoredSurvey>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT payload_json, submitted_by, submitted_at FROM survey WHERE form_id = ?1",
        )?;
        let survey = stmt
            .query_row(params![form_id], |row| Self::map_row(row))
            .optional()?;
        Ok(survey)
    }

    /// 同一供应商引用下的全部问卷（按提交时间）
    pub fn find_by_supplier_ref(&self, supplier_ref: &str) -> RepositoryResult<Vec<StoredSurvey>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT payload_json, submitted_by, submitted_at
            FROM survey
            WHERE supplier_ref = ?1
            ORDER BY submitted_at ASC, rowid ASC
            "#,
        )?;
        let surveys = stmt
            .query_map(params![supplier_ref], |row| Self::map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(surveys)
    }

    /// 已提交问卷总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM survey", [], |row| row.get(0))?;
        Ok(count)
    }

    fn map_row(row: &Row) -> SqliteResult<StoredSurvey> {
        let payload_json: String = row.get(0)?;
        let submission: SurveySubmission = serde_json::from_str(&payload_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let submitted_at_str: String = row.get(2)?;
        let submitted_at = NaiveDateTime::parse_from_str(&submitted_at_str, "%Y-%m-%d %H:%M:%S%.f")
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(StoredSurvey {
            submission,
            submitted_by: row.get(1)?,
            submitted_at,
        })
    }
}
