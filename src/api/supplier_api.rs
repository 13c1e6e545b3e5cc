// ==========================================
// Genco 原料溯源系统 - 供应商目录 API
// ==========================================
// 职责: 供应商/农户注册、查询、画像统计、供货合同登记
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_reader::FeedstockConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::contract::{Contract, NewContract};
use crate::domain::supplier::{NewSupplier, Supplier, SupplierPerformance};
use crate::domain::types::{
    ComplianceStatus, DeliveryStatus, ReadingDomainPolicy, SupplierStatus, SupplierType,
};
use crate::engine::delivery_filter::DeliverySummary;
use crate::engine::quality_scoring::QualityScoringEngine;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::contract_repo::ContractRepository;
use crate::repository::delivery_repo::DeliveryRepository;
use crate::repository::supplier_repo::SupplierRepository;

/// 供应商列表查询条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierQuery {
    /// 名称或邮箱子串（大小写不敏感）
    pub search: Option<String>,
    pub supplier_type: Option<SupplierType>,
    pub status: Option<SupplierStatus>,
}

/// 供应商画像（目录信息 + 交付统计）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProfile {
    pub supplier: Supplier,
    pub delivery_count: usize,
    pub pending_count: usize,
    pub approved_volume_t: f64,
    pub total_volume_t: f64,
    /// 该供应商全部交付的平均综合分（无交付为 None）
    pub average_score: Option<f64>,
    pub active_contract_count: usize,
}

// ==========================================
// SupplierApi - 供应商目录 API
// ==========================================
pub struct SupplierApi {
    supplier_repo: Arc<SupplierRepository>,
    delivery_repo: Arc<DeliveryRepository>,
    contract_repo: Arc<ContractRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn FeedstockConfigReader>,
}

impl SupplierApi {
    pub fn new(
        supplier_repo: Arc<SupplierRepository>,
        delivery_repo: Arc<DeliveryRepository>,
        contract_repo: Arc<ContractRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn FeedstockConfigReader>,
    ) -> Self {
        Self {
            supplier_repo,
            delivery_repo,
            contract_repo,
            action_log_repo,
            config,
        }
    }

    /// 注册供应商/农户
    ///
    /// # 校验
    /// - 名称非空
    /// - 邮箱包含 '@'
    /// - 坐标（若提供）在有效范围内
    ///
    /// 新注册一律为 PENDING 状态，合规状态待评估
    pub fn register_supplier(&self, input: NewSupplier, actor: &str) -> ApiResult<Supplier> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("供应商名称不能为空".to_string()));
        }
        if !input.email.contains('@') {
            return Err(ApiError::InvalidInput(format!("邮箱格式错误: {}", input.email)));
        }
        if let Some(c) = input.location.coordinates {
            let in_range = (-90.0..=90.0).contains(&c.lat) && (-180.0..=180.0).contains(&c.lng);
            if !in_range {
                return Err(ApiError::InvalidInput(format!(
                    "坐标超出范围: {},{}",
                    c.lat, c.lng
                )));
            }
        }

        let supplier = Supplier {
            supplier_id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            supplier_type: input.supplier_type,
            email: input.email.trim().to_string(),
            phone: input.phone,
            location: input.location,
            registration_date: chrono::Local::now().date_naive(),
            status: SupplierStatus::Pending,
            compliance_status: ComplianceStatus::Pending,
            performance: SupplierPerformance::default(),
        };
        self.supplier_repo.insert(&supplier)?;

        info!(supplier_id = %supplier.supplier_id, name = %supplier.name, "供应商已注册");

        let log = ActionLog::now(
            ActionType::RegisterSupplier,
            actor,
            Some(&supplier.supplier_id),
            Some(json!({
                "name": supplier.name,
                "supplier_type": supplier.supplier_type,
                "email": supplier.email,
            })),
            None,
        );
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(supplier)
    }

    /// 查询单个供应商
    pub fn get_supplier(&self, supplier_id: &str) -> ApiResult<Supplier> {
        self.supplier_repo
            .find_by_id(supplier_id)?
            .ok_or_else(|| ApiError::NotFound(format!("供应商(id={})不存在", supplier_id)))
    }

    /// 供应商列表
    pub fn list_suppliers(&self, query: &SupplierQuery) -> ApiResult<Vec<Supplier>> {
        Ok(self.supplier_repo.find_filtered(
            query.search.as_deref(),
            query.supplier_type,
            query.status,
        )?)
    }

    /// 供应商画像
    pub fn get_supplier_profile(&self, supplier_id: &str) -> ApiResult<SupplierProfile> {
        let supplier = self.get_supplier(supplier_id)?;
        let deliveries = self.delivery_repo.find_by_supplier(supplier_id)?;

        let policy = self.config.get_reading_domain_policy().unwrap_or_else(|e| {
            warn!(error = %e, "读取读数越界策略失败，使用 CLAMP");
            ReadingDomainPolicy::Clamp
        });
        let summary = DeliverySummary::from_records(&deliveries, &QualityScoringEngine::new(policy));

        let active_contract_count = self.contract_repo.count_active_by_supplier(supplier_id)? as usize;

        let approved_volume_t = deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Approved)
            .map(|d| d.volume_t)
            .sum();

        Ok(SupplierProfile {
            supplier,
            delivery_count: summary.total_count,
            pending_count: summary.pending_count,
            approved_volume_t,
            total_volume_t: summary.total_volume_t,
            average_score: summary.average_score,
            active_contract_count,
        })
    }

    /// 登记供货合同
    ///
    /// # 校验
    /// - 供应商存在
    /// - 条款非空
    /// - 结束日期不早于开始日期
    /// - 总量为正、单价非负（均为有限数值）
    pub fn add_contract(&self, input: NewContract, actor: &str) -> ApiResult<Contract> {
        self.get_supplier(&input.supplier_id)?;

        if input.terms.trim().is_empty() {
            return Err(ApiError::InvalidInput("合同条款不能为空".to_string()));
        }
        if input.end_date < input.start_date {
            return Err(ApiError::InvalidInput(format!(
                "合同结束日期早于开始日期: {} < {}",
                input.end_date, input.start_date
            )));
        }
        if !input.volume_t.is_finite() || input.volume_t <= 0.0 {
            return Err(ApiError::InvalidInput(format!("合同总量无效: {}", input.volume_t)));
        }
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(ApiError::InvalidInput(format!("合同单价无效: {}", input.price)));
        }

        let contract = Contract::from_input(uuid::Uuid::new_v4().to_string(), input);
        self.contract_repo.insert(&contract)?;

        info!(
            contract_id = %contract.contract_id,
            supplier_id = %contract.supplier_id,
            status = contract.status.to_db_str(),
            "供货合同已登记"
        );

        let log = ActionLog::now(
            ActionType::RegisterContract,
            actor,
            Some(&contract.supplier_id),
            Some(json!({
                "contract_id": contract.contract_id,
                "volume_t": contract.volume_t,
                "price": contract.price,
                "status": contract.status,
            })),
            None,
        );
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(contract)
    }

    /// 供应商的全部合同（按登记顺序）
    pub fn list_contracts(&self, supplier_id: &str) -> ApiResult<Vec<Contract>> {
        self.get_supplier(supplier_id)?;
        Ok(self.contract_repo.find_by_supplier(supplier_id)?)
    }
}
