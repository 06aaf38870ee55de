// ==========================================
// 供应商目录 - 配置层
// ==========================================
// 职责: 导入流程配置（语言、行数上限、操作人）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, ConfigManager, DEFAULT_IMPORTED_BY, DEFAULT_LOCALE, DEFAULT_MAX_IMPORT_ROWS,
    SUPPORTED_LOCALES,
};
pub use import_config_trait::ImportConfigReader;
