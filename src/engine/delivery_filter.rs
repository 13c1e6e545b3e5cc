// ==========================================
// Genco 原料溯源系统 - 交付筛选与汇总
// ==========================================
// 职责: 文本检索(供应商名称/收集点) + 状态筛选，稳定保序
//       汇总: 按状态计数、交付量合计、平均综合分
// ==========================================

use crate::domain::delivery::DeliveryRecord;
use crate::domain::types::DeliveryStatus;
use crate::engine::quality_scoring::QualityScoringEngine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// SupplierDirectory - 供应商目录查询接口
// ==========================================
// 供应商数据归外部所有，引擎只按 id 查名称
pub trait SupplierDirectory {
    fn supplier_name(&self, supplier_id: &str) -> Option<&str>;
}

impl SupplierDirectory for HashMap<String, String> {
    fn supplier_name(&self, supplier_id: &str) -> Option<&str> {
        self.get(supplier_id).map(|s| s.as_str())
    }
}

// ==========================================
// DeliveryFilter - 筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFilter {
    /// 检索词（大小写不敏感的子串匹配），None/空串匹配全部
    pub search: Option<String>,
    /// 状态，None 表示全部
    pub status: Option<DeliveryStatus>,
}

impl DeliveryFilter {
    pub fn with_status(status: DeliveryStatus) -> Self {
        Self {
            search: None,
            status: Some(status),
        }
    }

    pub fn with_search(search: &str) -> Self {
        Self {
            search: Some(search.to_string()),
            status: None,
        }
    }

    /// 单条记录是否命中
    pub fn matches(&self, record: &DeliveryRecord, directory: &dyn SupplierDirectory) -> bool {
        let matches_status = self.status.map_or(true, |s| record.status == s);
        if !matches_status {
            return false;
        }

        let term = match self.search.as_deref() {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };

        let matches_supplier = directory
            .supplier_name(&record.supplier_id)
            .map_or(false, |name| name.to_lowercase().contains(&term));

        matches_supplier || record.location.to_lowercase().contains(&term)
    }

    /// 筛选（保持输入顺序）
    pub fn apply<'a>(
        &self,
        records: &'a [DeliveryRecord],
        directory: &dyn SupplierDirectory,
    ) -> Vec<&'a DeliveryRecord> {
        records
            .iter()
            .filter(|r| self.matches(r, directory))
            .collect()
    }
}

// ==========================================
// DeliverySummary - 驾驶舱汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub total_count: usize,
    pub pending_count: usize,
    pub approved_count: usize,
    pub rejected_count: usize,
    pub total_volume_t: f64,
    /// 平均综合分（空集为 None）
    pub average_score: Option<f64>,
}

impl DeliverySummary {
    /// 汇总一组交付记录
    ///
    /// 读数无法评分（非有限值/REJECT 策略下域外）的记录不计入平均分
    pub fn from_records<'a, I>(records: I, scoring: &QualityScoringEngine) -> Self
    where
        I: IntoIterator<Item = &'a DeliveryRecord>,
    {
        let mut summary = DeliverySummary::default();
        let mut score_sum = 0u64;
        let mut scored = 0u64;

        for record in records {
            summary.total_count += 1;
            summary.total_volume_t += record.volume_t;
            match record.status {
                DeliveryStatus::Pending => summary.pending_count += 1,
                DeliveryStatus::Approved => summary.approved_count += 1,
                DeliveryStatus::Rejected => summary.rejected_count += 1,
            }
            if let Ok(score) = scoring.score(&record.quality) {
                score_sum += u64::from(score);
                scored += 1;
            }
        }

        if scored > 0 {
            summary.average_score = Some(score_sum as f64 / scored as f64);
        }
        summary
    }

    /// 指定状态的数量
    pub fn count_of(&self, status: DeliveryStatus) -> usize {
        match status {
            DeliveryStatus::Pending => self.pending_count,
            DeliveryStatus::Approved => self.approved_count,
            DeliveryStatus::Rejected => self.rejected_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::delivery::NewDelivery;
    use crate::domain::quality::QualityReading;
    use crate::domain::types::ReadingDomainPolicy;
    use chrono::NaiveDate;

    fn record(id: &str, supplier_id: &str, location: &str, status: DeliveryStatus, volume_t: f64) -> DeliveryRecord {
        let mut r = DeliveryRecord::new_pending(
            id.to_string(),
            NewDelivery {
                supplier_id: supplier_id.to_string(),
                delivery_date: NaiveDate::from_ymd_opt(2024, 11, 8).unwrap(),
                volume_t,
                quality: QualityReading::new(12.0, 94.0, 2.0),
                location: location.to_string(),
                photos: vec![],
            },
        );
        r.status = status;
        if status == DeliveryStatus::Approved {
            r.certificate_ref = Some(format!("/certificates/{}.pdf", id));
        }
        r
    }

    fn directory() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("1".to_string(), "PT. Agro Lestari".to_string());
        map.insert("2".to_string(), "Santo Farmer Group".to_string());
        map
    }

    fn sample() -> Vec<DeliveryRecord> {
        vec![
            record("f1", "1", "Jakarta Collection Point", DeliveryStatus::Approved, 8500.0),
            record("f2", "2", "Bali Collection Point", DeliveryStatus::Pending, 3200.0),
            record("f3", "1", "Bandung Depot", DeliveryStatus::Pending, 1000.0),
            record("f4", "9", "Medan Port", DeliveryStatus::Rejected, 500.0),
            record("f5", "2", "Denpasar Hub", DeliveryStatus::Pending, 700.0),
        ]
    }

    #[test]
    fn test_status_filter_is_exact_and_stable() {
        let records = sample();
        let filter = DeliveryFilter::with_status(DeliveryStatus::Pending);
        let ids: Vec<&str> = filter
            .apply(&records, &directory())
            .into_iter()
            .map(|r| r.delivery_id.as_str())
            .collect();
        assert_eq!(ids, vec!["f2", "f3", "f5"]);
    }

    #[test]
    fn test_search_matches_supplier_name_case_insensitive() {
        let records = sample();
        let filter = DeliveryFilter::with_search("agro");
        let ids: Vec<&str> = filter
            .apply(&records, &directory())
            .into_iter()
            .map(|r| r.delivery_id.as_str())
            .collect();
        assert_eq!(ids, vec!["f1", "f3"]);
    }

    #[test]
    fn test_search_matches_location() {
        let records = sample();
        let filter = DeliveryFilter::with_search("COLLECTION");
        assert_eq!(filter.apply(&records, &directory()).len(), 2);

        // 供应商不在目录中时仍可按收集点命中
        let filter = DeliveryFilter::with_search("medan");
        let hits = filter.apply(&records, &directory());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].delivery_id, "f4");
    }

    #[test]
    fn test_empty_search_matches_all() {
        let records = sample();
        assert_eq!(DeliveryFilter::with_search("").apply(&records, &directory()).len(), 5);
        assert_eq!(DeliveryFilter::default().apply(&records, &directory()).len(), 5);
    }

    #[test]
    fn test_search_and_status_combined() {
        let records = sample();
        let filter = DeliveryFilter {
            search: Some("santo".to_string()),
            status: Some(DeliveryStatus::Pending),
        };
        let ids: Vec<&str> = filter
            .apply(&records, &directory())
            .into_iter()
            .map(|r| r.delivery_id.as_str())
            .collect();
        assert_eq!(ids, vec!["f2", "f5"]);
    }

    #[test]
    fn test_summary_counts_and_volume() {
        let records = sample();
        let scoring = QualityScoringEngine::new(ReadingDomainPolicy::Clamp);
        let summary = DeliverySummary::from_records(&records, &scoring);

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.count_of(DeliveryStatus::Pending), 3);
        assert_eq!(summary.count_of(DeliveryStatus::Approved), 1);
        assert_eq!(summary.count_of(DeliveryStatus::Rejected), 1);
        assert_eq!(summary.total_volume_t, 13900.0);
        assert_eq!(summary.average_score, Some(75.0));
    }

    #[test]
    fn test_summary_of_empty_set() {
        let scoring = QualityScoringEngine::default();
        let empty: Vec<DeliveryRecord> = Vec::new();
        let summary = DeliverySummary::from_records(&empty, &scoring);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.total_volume_t, 0.0);
        assert_eq!(summary.average_score, None);
    }
}
