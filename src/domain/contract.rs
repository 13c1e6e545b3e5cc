// ==========================================
// Genco 原料溯源系统 - 供货合同领域模型
// ==========================================
// 合同归属于目录中的供应商（contract.supplier_id 外键）
// ==========================================

use crate::domain::types::ContractStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Contract - 供货合同
// ==========================================
// 对齐: contract 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: String,
    pub supplier_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate, // 含当日
    pub terms: String,       // 交付条款原文
    pub volume_t: f64,       // 合同总量（吨）
    pub price: f64,          // 单价
    pub status: ContractStatus,
}

/// 合同登记输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContract {
    pub supplier_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub terms: String,
    pub volume_t: f64,
    pub price: f64,
    pub status: ContractStatus,
}

impl Contract {
    pub fn from_input(contract_id: String, input: NewContract) -> Self {
        Self {
            contract_id,
            supplier_id: input.supplier_id,
            start_date: input.start_date,
            end_date: input.end_date,
            terms: input.terms.trim().to_string(),
            volume_t: input.volume_t,
            price: input.price,
            status: input.status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }
}
