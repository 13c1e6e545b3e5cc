// ==========================================
// Genco 原料溯源系统 - 报表导出 API
// ==========================================
// 职责: 把筛选后的交付列表导出为 CSV（含综合分/等级/状态）
// ==========================================

use std::io::Write;
use std::sync::Arc;

use csv::Writer;
use tracing::info;

use crate::api::delivery_api::{DeliveryApi, DeliveryView};
use crate::api::error::{ApiError, ApiResult};
use crate::engine::delivery_filter::DeliveryFilter;

/// CSV 表头
pub const DELIVERY_CSV_HEADER: &[&str] = &[
    "delivery_id",
    "delivery_date",
    "supplier",
    "location",
    "volume_t",
    "moisture_percent",
    "purity_percent",
    "contamination_percent",
    "score",
    "tier",
    "status",
    "certificate_ref",
];

pub struct ReportApi {
    delivery_api: Arc<DeliveryApi>,
}

impl ReportApi {
    pub fn new(delivery_api: Arc<DeliveryApi>) -> Self {
        Self { delivery_api }
    }

    /// 导出交付列表
    ///
    /// # 返回
    /// - Ok(rows): 写出的数据行数（不含表头）
    pub fn export_deliveries_csv<W: Write>(
        &self,
        filter: &DeliveryFilter,
        out: W,
    ) -> ApiResult<usize> {
        let views = self.delivery_api.list_deliveries(filter)?;

        let mut writer = Writer::from_writer(out);
        writer.write_record(DELIVERY_CSV_HEADER)?;
        for view in &views {
            writer.write_record(csv_row(view))?;
        }
        writer
            .flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        info!(rows = views.len(), "交付报表已导出");
        Ok(views.len())
    }
}

fn csv_row(view: &DeliveryView) -> Vec<String> {
    vec![
        view.delivery_id.clone(),
        view.delivery_date.format("%Y-%m-%d").to_string(),
        view.supplier_name.clone().unwrap_or_default(),
        view.location.clone(),
        view.volume_t.to_string(),
        view.quality.moisture_percent.to_string(),
        view.quality.purity_percent.to_string(),
        view.quality.contamination_percent.to_string(),
        view.score.map(|s| s.to_string()).unwrap_or_default(),
        view.tier.map(|t| t.to_string()).unwrap_or_default(),
        view.status.to_string(),
        view.certificate_ref.clone().unwrap_or_default(),
    ]
}
