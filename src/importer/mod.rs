// ==========================================
// 供应商目录 - 导入层
// ==========================================
// 职责: 表格文件 → 规范供应商草稿 → 预览 → 容错提交
// 支持: Excel (.xlsx), CSV (.csv)
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod error;
pub mod file_parser;
pub mod import_controller;
pub mod importer_trait;
pub mod normalizer;
pub mod row_validator;

// 重导出核心类型
pub use column_resolver::ColumnResolver;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_controller::{ImportController, ImportSettings, ImportState};
pub use row_validator::RowValidatorImpl;

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RowValidator};
