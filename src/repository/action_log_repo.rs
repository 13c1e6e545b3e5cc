// ==========================================
// Genco 原料溯源系统 - 操作日志数据仓储
// ==========================================
// 红线: 审批/拒收/截断/注册/问卷提交均需写入 action_log
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use core::ActionLogRepository;
