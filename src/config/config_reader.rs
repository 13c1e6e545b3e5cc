// ==========================================
// Genco 原料溯源系统 - 业务配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::ReadingDomainPolicy;
use std::error::Error;

// ==========================================
// FeedstockConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait FeedstockConfigReader: Send + Sync {
    /// 获取质检读数越界策略
    ///
    /// # 默认值
    /// - CLAMP
    fn get_reading_domain_policy(&self) -> Result<ReadingDomainPolicy, Box<dyn Error>>;

    /// 获取证书引用前缀
    ///
    /// # 默认值
    /// - "/certificates/"
    fn get_certificate_prefix(&self) -> Result<String, Box<dyn Error>>;

    /// 获取界面默认语言
    ///
    /// # 默认值
    /// - "en"
    fn get_default_locale(&self) -> Result<String, Box<dyn Error>>;
}
