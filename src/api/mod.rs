// ==========================================
// 供应商目录 - API 层
// ==========================================
// 职责: 面向命令行 / 上层界面的导入接口
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{
    ColumnMatch, ImportApi, ImportPreviewResponse, ImportSummaryResponse, RowPreview,
};
