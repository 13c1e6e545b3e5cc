// ==========================================
// Genco 原料溯源系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一个 Arc<Mutex<Connection>>
// ==========================================

use std::sync::{Arc, Mutex};
use rusqlite::Connection;

use crate::api::{DashboardApi, DeliveryApi, ReportApi, SupplierApi, SurveyApi};
use crate::config::{ConfigManager, FeedstockConfigReader};
use crate::repository::{
    ActionLogRepository, ContractRepository, DeliveryRepository, SupplierRepository,
    SurveyRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    /// 交付追踪API
    pub delivery_api: Arc<DeliveryApi>,

    /// 供应商目录API
    pub supplier_api: Arc<SupplierApi>,

    /// 问卷API
    pub survey_api: Arc<SurveyApi>,

    /// 报表导出API
    pub report_api: Arc<ReportApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 供应商仓储（演示数据写入）
    pub supplier_repo: Arc<SupplierRepository>,

    /// 交付仓储（演示数据写入）
    pub delivery_repo: Arc<DeliveryRepository>,

    /// 合同仓储（演示数据写入）
    pub contract_repo: Arc<ContractRepository>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 该方法会：
    /// 1. 打开数据库并执行建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    /// 4. 按配置设置界面语言
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let state = Self::from_connection(conn, db_path)?;

        match state.config_manager.get_default_locale() {
            Ok(locale) => crate::i18n::set_locale(&locale),
            Err(e) => tracing::warn!(error = %e, "读取默认语言失败，保持当前语言"),
        }

        Ok(state)
    }

    /// 基于内存数据库创建（测试/演示）
    ///
    /// 不切换全局界面语言
    pub fn in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("无法打开内存数据库: {}", e))?;
        crate::db::configure_sqlite_connection(&conn)
            .map_err(|e| format!("数据库连接配置失败: {}", e))?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, db_path: String) -> Result<Self, String> {
        crate::db::init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        match crate::db::read_schema_version(&conn) {
            Ok(Some(v)) if v == crate::db::CURRENT_SCHEMA_VERSION => {}
            Ok(v) => tracing::warn!(
                found = ?v,
                expected = crate::db::CURRENT_SCHEMA_VERSION,
                "schema_version 与当前代码不一致"
            ),
            Err(e) => tracing::warn!(error = %e, "读取 schema_version 失败"),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let delivery_repo = Arc::new(DeliveryRepository::new(conn.clone()));
        let supplier_repo = Arc::new(SupplierRepository::new(conn.clone()));
        let contract_repo = Arc::new(ContractRepository::new(conn.clone()));
        let survey_repo = Arc::new(SurveyRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn FeedstockConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let delivery_api = Arc::new(DeliveryApi::new(
            delivery_repo.clone(),
            supplier_repo.clone(),
            action_log_repo.clone(),
            config_reader.clone(),
        ));

        let supplier_api = Arc::new(SupplierApi::new(
            supplier_repo.clone(),
            delivery_repo.clone(),
            contract_repo.clone(),
            action_log_repo.clone(),
            config_reader,
        ));

        let survey_api = Arc::new(SurveyApi::new(survey_repo.clone(), action_log_repo.clone()));

        let report_api = Arc::new(ReportApi::new(delivery_api.clone()));

        let dashboard_api = Arc::new(DashboardApi::new(
            delivery_api.clone(),
            supplier_repo.clone(),
            survey_repo,
            action_log_repo.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            delivery_api,
            supplier_api,
            survey_api,
            report_api,
            dashboard_api,
            config_manager,
            supplier_repo,
            delivery_repo,
            contract_repo,
            action_log_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 GENCO_FEEDSTOCK_DB_PATH
/// 2. 用户数据目录下 genco-feedstock/genco_feedstock.db
/// 3. 当前目录 ./genco_feedstock.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("GENCO_FEEDSTOCK_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./genco_feedstock.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("genco-feedstock-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("genco-feedstock");

        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("genco_feedstock.db");
        }
    }

    path.to_string_lossy().to_string()
}
