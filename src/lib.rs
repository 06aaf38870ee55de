// ==========================================
// 供应商目录 - 批量导入核心库
// ==========================================
// 技术栈: Rust + SQLite
// 流程: 表格解析 → 列名解析 → 字段归一化 → 逐行校验 → 预览 → 容错提交
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 解析 / 归一化 / 校验 / 提交
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 导入接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ImportOutcome, ImportSummary, NormalizedKind, RawRow, RawValue, SupplierDraft,
    SupplierField, SupplierKind, ValidatedImportRecord,
};

// 导入
pub use importer::{ImportController, ImportError, ImportState};

// API
pub use api::ImportApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "supplier-import";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
