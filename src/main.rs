// ==========================================
// Genco 原料溯源系统 - 命令行入口
// ==========================================
// 打开默认数据库，空库时写入演示数据，输出驾驶舱统计 JSON
// ==========================================

use anyhow::{anyhow, Context, Result};

use genco_feedstock::app::{get_default_db_path, seed_demo_data, AppState};

fn main() -> Result<()> {
    // 初始化日志系统（GENCO_FEEDSTOCK_LOG_FORMAT=json 输出 JSON）
    let log_format = genco_feedstock::logging::LogFormat::from_env();
    genco_feedstock::logging::init_with_format(log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", genco_feedstock::APP_NAME);
    tracing::info!("系统版本: {}", genco_feedstock::VERSION);
    tracing::info!("==================================================");

    // 命令行参数优先，其次默认路径
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    seed_demo_data(&state).context("写入演示数据失败")?;

    let stats = state
        .dashboard_api
        .get_dashboard_stats()
        .context("读取驾驶舱统计失败")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
