// ==========================================
// Genco 原料溯源系统 - 应用层
// ==========================================
// 职责: 装配仓储/配置/API，提供默认数据库路径与演示数据
// ==========================================

pub mod seed;
pub mod state;

// 重导出
pub use seed::seed_demo_data;
pub use state::{AppState, get_default_db_path};
