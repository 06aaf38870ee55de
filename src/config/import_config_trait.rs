// ==========================================
// 供应商目录 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入控制器启动时读取
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 界面与校验消息语言
    ///
    /// # 默认值
    /// - "pt-BR"
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;

    /// 单个文件允许的最大数据行数（超出视为格式错误）
    ///
    /// # 默认值
    /// - 5000
    async fn get_max_import_rows(&self) -> Result<usize, Box<dyn Error>>;

    /// 写入 suppliers.created_by 的操作人标识
    ///
    /// # 默认值
    /// - "import"
    async fn get_imported_by(&self) -> Result<String, Box<dyn Error>>;
}
